//! Audit trail queries
//!
//! AuditService đọc lại JSONL events để xem history theo ship, năm hoặc
//! loại thao tác.

use crate::error::BusinessResult;
use crate::services::ServiceContext;
use fueleu_core::ComplianceEvent;
use fueleu_persistence::{EventFilter, EventReader};

/// Audit Service
pub struct AuditService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AuditService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Events khớp filter; `from`/`to` (YYYY-MM-DD) giới hạn theo ngày ghi
    pub fn history(
        &self,
        filter: &EventFilter,
        from: Option<&str>,
        to: Option<&str>,
    ) -> BusinessResult<Vec<ComplianceEvent>> {
        let events = EventReader::new(self.ctx.events().base_path()).read_between(from, to)?;

        Ok(filter.apply(events))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::banking::BankingService;
    use crate::routes::RouteService;
    use crate::services::testing::context;
    use fueleu_core::EventType;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_history_for_ship() {
        let (ctx, _dir) = context().await;

        BankingService::new(&ctx).bank_surplus("S1", 2024, dec!(10)).await.unwrap();
        BankingService::new(&ctx).bank_surplus("S2", 2024, dec!(20)).await.unwrap();
        RouteService::new(&ctx).set_baseline_by_route_id("R002").await.unwrap();

        let audit = AuditService::new(&ctx);
        let all = audit.history(&EventFilter::new(), None, None).unwrap();
        assert_eq!(all.len(), 3);

        let s1 = audit.history(&EventFilter::new().ship("S1"), None, None).unwrap();
        assert_eq!(s1.len(), 1);
        assert_eq!(s1[0].event_type, EventType::SurplusBanked);
        assert_eq!(s1[0].amount, Some(dec!(10)));

        let ids: Vec<_> = all.iter().map(|e| e.event_id.as_str()).collect();
        assert_eq!(ids, vec!["EVT_000001", "EVT_000002", "EVT_000003"]);
    }
}
