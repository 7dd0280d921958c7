//! Route operations - listing, baseline transfer, comparison

use crate::error::{BusinessError, BusinessResult};
use crate::services::ServiceContext;
use fueleu_core::{compare_routes, ComparisonReport, ComplianceEvent, Route};
use fueleu_persistence::RouteRepo;

/// Route Service
pub struct RouteService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> RouteService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Tất cả routes
    pub async fn list(&self) -> BusinessResult<Vec<Route>> {
        let mut conn = self.ctx.conn().await?;
        Ok(RouteRepo::find_all(&mut conn).await?)
    }

    /// Lấy route theo route_id
    pub async fn get(&self, route_id: &str) -> BusinessResult<Route> {
        let mut conn = self.ctx.conn().await?;
        RouteRepo::find_by_route_id(&mut conn, route_id)
            .await?
            .ok_or_else(|| BusinessError::not_found("Route", route_id))
    }

    /// Validate rồi lưu route (insert hoặc update theo route_id)
    pub async fn save(&self, route: &Route) -> BusinessResult<Route> {
        route.validate(self.ctx.config())?;

        let mut conn = self.ctx.conn().await?;
        let saved = RouteRepo::save(&mut conn, route).await?;
        tracing::info!(route_id = %saved.route_id, id = saved.id, "route saved");
        Ok(saved)
    }

    /// Chuyển baseline sang route `id`
    pub async fn set_baseline(&self, id: i64) -> BusinessResult<Route> {
        let mut conn = self.ctx.conn().await?;
        let route = RouteRepo::set_baseline(&mut conn, id).await.map_err(|err| {
            if err.is_not_found() {
                BusinessError::not_found("Route", id)
            } else {
                err.into()
            }
        })?;
        drop(conn);

        tracing::info!(route_id = %route.route_id, id, "baseline set");
        self.ctx
            .record(|id| ComplianceEvent::baseline_set(id, &route.route_id, route.year))
            .await;

        Ok(route)
    }

    /// Chuyển baseline theo route_id (e.g., R002)
    pub async fn set_baseline_by_route_id(&self, route_id: &str) -> BusinessResult<Route> {
        let route = self.get(route_id).await?;
        self.set_baseline(route.id).await
    }

    /// So sánh mọi route với baseline hiện tại
    pub async fn compare(&self) -> BusinessResult<ComparisonReport> {
        let mut conn = self.ctx.conn().await?;
        let baseline = RouteRepo::find_baseline(&mut conn).await?;
        let routes = RouteRepo::find_all(&mut conn).await?;

        let report = compare_routes(baseline.as_ref(), &routes, self.ctx.config().target_intensity)?;
        tracing::debug!(
            baseline = %report.baseline.route_id,
            rows = report.comparisons.len(),
            "comparison computed"
        );
        Ok(report)
    }
}
