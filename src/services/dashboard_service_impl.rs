//! `SeaORM` implementation of the `DashboardService` trait.

use async_trait::async_trait;
use chrono::{Datelike, Duration};
use std::sync::Arc;

use crate::db::Store;
use crate::domain::calendar::{day_range, local_date, month_range, year_range};
use crate::domain::clock::{Clock, format_timestamp, parse_timestamp};
use crate::domain::status::{MAX_ARCHIVE_DAYS, archive_cutoff, archives_at};
use crate::domain::{DocumentId, UserId};
use crate::services::config_cache::ConfigCache;
use crate::services::dashboard_service::{
    ChartData, DashboardError, DashboardService, DashboardStats, ExpiringDocument, PieChartData,
    item_composition, monthly_chart,
};

pub struct SeaOrmDashboardService {
    store: Store,
    config: Arc<ConfigCache>,
    clock: Arc<dyn Clock>,
}

impl SeaOrmDashboardService {
    #[must_use]
    pub fn new(store: Store, config: Arc<ConfigCache>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            config,
            clock,
        }
    }

    async fn count_between(
        &self,
        range: (chrono::DateTime<chrono::Utc>, chrono::DateTime<chrono::Utc>),
    ) -> Result<u64, DashboardError> {
        let (start, end) = range;
        Ok(self
            .store
            .document_repo()
            .count_reported_between(&format_timestamp(start), &format_timestamp(end))
            .await?)
    }
}

#[async_trait]
impl DashboardService for SeaOrmDashboardService {
    async fn stats(&self) -> Result<DashboardStats, DashboardError> {
        let tz = self.config.location_or_utc().await;
        let today = local_date(tz, self.clock.now());

        let docs_today = self.count_between(day_range(tz, today)?).await?;
        let docs_monthly = self
            .count_between(month_range(tz, today.year(), today.month())?)
            .await?;
        let docs_yearly = self.count_between(year_range(tz, today.year())?).await?;
        let active_users = self.store.user_repo().count_active().await?;

        Ok(DashboardStats {
            docs_today,
            docs_monthly,
            docs_yearly,
            active_users,
        })
    }

    async fn monthly_issuance(&self) -> Result<ChartData, DashboardError> {
        let tz = self.config.location_or_utc().await;
        let year = local_date(tz, self.clock.now()).year();
        let (start, end) = year_range(tz, year)?;

        let dates = self
            .store
            .document_repo()
            .report_dates_between(&format_timestamp(start), &format_timestamp(end))
            .await?;

        let mut months = Vec::with_capacity(dates.len());
        for date in &dates {
            months.push(local_date(tz, parse_timestamp(date)?).month());
        }

        Ok(monthly_chart(months))
    }

    async fn item_composition(&self) -> Result<PieChartData, DashboardError> {
        let names = self.store.document_repo().live_item_names().await?;
        Ok(item_composition(names))
    }

    async fn expiring_documents(
        &self,
        user: UserId,
        window_days: i64,
    ) -> Result<Vec<ExpiringDocument>, DashboardError> {
        let settings = self.config.get().await?;
        let days = settings.archive_duration_days;

        let start = archive_cutoff(self.clock.now(), days);
        let end = start + Duration::days(window_days.clamp(0, MAX_ARCHIVE_DAYS));

        let records = self
            .store
            .document_repo()
            .operator_documents_between(
                user.value(),
                &format_timestamp(start),
                &format_timestamp(end),
            )
            .await?;

        records
            .into_iter()
            .map(|record| {
                let reported = parse_timestamp(&record.document.report_date)?;
                Ok::<_, DashboardError>(ExpiringDocument {
                    id: DocumentId::new(record.document.id),
                    document_number: record.document.document_number,
                    resident_name: record.resident.map(|r| r.full_name),
                    report_date: record.document.report_date,
                    archives_at: format_timestamp(archives_at(reported, days)),
                })
            })
            .collect()
    }
}
