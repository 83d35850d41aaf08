//! Read-only statistics for the dashboard.

use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;

use crate::domain::{DocumentId, UserId};

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for DashboardError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for DashboardError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "Mei", "Jun", "Jul", "Ags", "Sep", "Okt", "Nov", "Des",
];

pub const CHART_COLORS: [&str; 6] = [
    "#4e73df", "#1cc88a", "#36b9cc", "#f6c23e", "#e74a3b", "#858796",
];

pub const OTHERS_LABEL: &str = "Lainnya";

const TOP_ITEMS: usize = 5;

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct DashboardStats {
    pub docs_today: u64,
    pub docs_monthly: u64,
    pub docs_yearly: u64,
    pub active_users: u64,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub data: Vec<u64>,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct PieChartData {
    pub labels: Vec<String>,
    pub data: Vec<u64>,
    pub background_colors: Vec<String>,
}

/// A letter about to switch to archived.
#[derive(Debug, Clone, Serialize)]
pub struct ExpiringDocument {
    pub id: DocumentId,
    pub document_number: String,
    pub resident_name: Option<String>,
    pub report_date: String,
    pub archives_at: String,
}

/// Groups item names, keeps the five most frequent and folds the rest into
/// a single "Lainnya" slice.
#[must_use]
pub fn item_composition<I>(names: I) -> PieChartData
where
    I: IntoIterator<Item = String>,
{
    let mut counts: HashMap<String, u64> = HashMap::new();
    for name in names {
        *counts.entry(name).or_default() += 1;
    }

    let mut ranked: Vec<(String, u64)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let mut chart = PieChartData::default();
    let mut others = 0;

    for (index, (name, count)) in ranked.into_iter().enumerate() {
        if index < TOP_ITEMS {
            chart.labels.push(name);
            chart.data.push(count);
        } else {
            others += count;
        }
    }

    if others > 0 {
        chart.labels.push(OTHERS_LABEL.to_string());
        chart.data.push(others);
    }

    chart.background_colors = CHART_COLORS
        .iter()
        .take(chart.labels.len())
        .map(|c| (*c).to_string())
        .collect();

    chart
}

/// Per-month counts from local month numbers (1-12); others are ignored.
#[must_use]
pub fn monthly_chart<I>(months: I) -> ChartData
where
    I: IntoIterator<Item = u32>,
{
    let mut data = vec![0_u64; 12];
    for month in months {
        if (1..=12).contains(&month) {
            data[(month - 1) as usize] += 1;
        }
    }

    ChartData {
        labels: MONTH_LABELS.iter().map(|l| (*l).to_string()).collect(),
        data,
    }
}

#[async_trait::async_trait]
pub trait DashboardService: Send + Sync {
    /// Counts for today, this month and this year in the office timezone.
    async fn stats(&self) -> Result<DashboardStats, DashboardError>;

    async fn monthly_issuance(&self) -> Result<ChartData, DashboardError>;

    async fn item_composition(&self) -> Result<PieChartData, DashboardError>;

    /// The user's letters that archive within the next `window_days`.
    async fn expiring_documents(
        &self,
        user: UserId,
        window_days: i64,
    ) -> Result<Vec<ExpiringDocument>, DashboardError>;
}
