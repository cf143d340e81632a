//! Scheduled report composition: derive the reporting window, gather counts
//! from the store, render the WhatsApp message, and dispatch it through the
//! gateway.

use crate::analytics::{DateWindow, group_counts};
use crate::db::errors::DbError;
use crate::db::handlers::Leads;
use crate::db::models::settings::InstanceSettings;
use crate::errors::{Error, Result};
use crate::gateway::GatewayClient;
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::{info, instrument};
use utoipa::ToSchema;

/// Cadence label for leads without a cadence day in report breakdowns.
const CADENCE_UNKNOWN: &str = "Desconhecido";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    Daily,
    Weekly,
}

impl ReportKind {
    /// Display name used in the message header.
    pub fn title(&self) -> &'static str {
        match self {
            ReportKind::Daily => "Diário",
            ReportKind::Weekly => "Semanal",
        }
    }
}

/// Window covered by a report issued on `today`.
///
/// Daily reports cover yesterday in full. Weekly reports cover the last
/// completed Monday-to-Sunday week; when today is a Sunday the week ends
/// today.
pub fn report_window(kind: ReportKind, today: NaiveDate) -> DateWindow {
    match kind {
        ReportKind::Daily => DateWindow::day(today - Duration::days(1)),
        ReportKind::Weekly => {
            let end = today - Duration::days(i64::from(today.weekday().num_days_from_sunday()));
            DateWindow::new(end - Duration::days(6), end)
        }
    }
}

/// Human-readable period label, `dd/MM/yyyy` or `dd/MM/yyyy a dd/MM/yyyy`.
pub fn window_label(kind: ReportKind, window: &DateWindow) -> String {
    match kind {
        ReportKind::Daily => window.start.format("%d/%m/%Y").to_string(),
        ReportKind::Weekly => format!(
            "{} a {}",
            window.start.format("%d/%m/%Y"),
            window.end.format("%d/%m/%Y")
        ),
    }
}

/// Counts gathered for one report window.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportCounts {
    pub new_leads: i64,
    pub contacted: i64,
    pub repassed: i64,
    /// Per-cadence-day tallies, sorted lexicographically by label
    pub cadence: Vec<(String, u64)>,
}

/// Tally cadence-day values client-side, labeling missing values and
/// sorting the buckets lexicographically.
pub fn tally_cadence(values: &[Option<String>]) -> Vec<(String, u64)> {
    let mut counts = group_counts(values, |value| {
        value.clone().unwrap_or_else(|| CADENCE_UNKNOWN.to_string())
    });
    counts.sort_by(|a, b| a.0.cmp(&b.0));
    counts
}

/// Render the WhatsApp message body for a report.
pub fn render_message(kind: ReportKind, period_label: &str, counts: &ReportCounts) -> String {
    let mut cadence_lines = String::new();
    for (day, count) in &counts.cadence {
        cadence_lines.push_str(&format!("- {day}: {count}\n"));
    }
    let cadence_section = if cadence_lines.is_empty() {
        "Nenhum dado".to_string()
    } else {
        cadence_lines
    };

    format!(
        "📊 *Relatório {}*\n📅 Período: {}\n\n🆕 *Novos Leads:* {}\n💬 *Total Contactados:* {}\n🔄 *Total Repasse:* {}\n\n📉 *Por Dia da Cadência:*\n{}",
        kind.title(),
        period_label,
        counts.new_leads,
        counts.contacted,
        counts.repassed,
        cadence_section
    )
}

/// Check that every credential needed to dispatch is present, before any
/// store query runs.
pub fn require_credentials(settings: &InstanceSettings) -> Result<()> {
    if !settings.is_complete() {
        return Err(Error::Configuration {
            message: "Instance name, API key and notification number must all be configured".to_string(),
        });
    }
    Ok(())
}

async fn gather_counts(db: &PgPool, window: &DateWindow) -> Result<ReportCounts> {
    let start: DateTime<Utc> = to_utc(window.start_bound());
    let end: DateTime<Utc> = to_utc(window.end_bound());

    let (new_leads, contacted, repassed, cadence_values) = tokio::try_join!(
        async {
            let mut conn = db.acquire().await.map_err(DbError::from)?;
            Leads::new(&mut conn).count_created_between(start, end).await
        },
        async {
            let mut conn = db.acquire().await.map_err(DbError::from)?;
            Leads::new(&mut conn).count_interacted_between(start, end).await
        },
        async {
            let mut conn = db.acquire().await.map_err(DbError::from)?;
            Leads::new(&mut conn).count_repassed_between(start, end).await
        },
        async {
            let mut conn = db.acquire().await.map_err(DbError::from)?;
            Leads::new(&mut conn).cadence_days_between(start, end).await
        },
    )?;

    Ok(ReportCounts {
        new_leads,
        contacted,
        repassed,
        cadence: tally_cadence(&cadence_values),
    })
}

fn to_utc(naive: NaiveDateTime) -> DateTime<Utc> {
    DateTime::from_naive_utc_and_offset(naive, Utc)
}

/// Compose a report for the window ending before `now` and send it to the
/// configured notification number. Failed sends surface as errors and are
/// never retried here.
#[instrument(skip(db, gateway, settings), fields(kind = ?kind), err)]
pub async fn compose_and_send(
    db: &PgPool,
    gateway: &GatewayClient,
    settings: &InstanceSettings,
    kind: ReportKind,
    now: DateTime<Utc>,
) -> Result<String> {
    require_credentials(settings)?;

    let window = report_window(kind, now.date_naive());
    let label = window_label(kind, &window);
    let counts = gather_counts(db, &window).await?;
    let message = render_message(kind, &label, &counts);

    gateway
        .send_text(
            &settings.instance_name,
            &settings.api_key,
            &settings.notification_number,
            &message,
        )
        .await?;

    info!(period = %label, "report dispatched");
    Ok(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn daily_window_is_yesterday() {
        let window = report_window(ReportKind::Daily, date(2024, 3, 13));
        assert_eq!(window, DateWindow::day(date(2024, 3, 12)));
        assert_eq!(window_label(ReportKind::Daily, &window), "12/03/2024");
    }

    #[test]
    fn weekly_window_is_last_completed_monday_to_sunday() {
        // Wednesday
        let window = report_window(ReportKind::Weekly, date(2024, 3, 13));
        assert_eq!(window, DateWindow::new(date(2024, 3, 4), date(2024, 3, 10)));
        assert_eq!(window_label(ReportKind::Weekly, &window), "04/03/2024 a 10/03/2024");
    }

    #[test]
    fn weekly_window_on_a_sunday_ends_today() {
        let sunday = date(2024, 3, 10);
        let window = report_window(ReportKind::Weekly, sunday);
        assert_eq!(window, DateWindow::new(date(2024, 3, 4), sunday));
    }

    #[test]
    fn weekly_window_on_a_monday_ends_yesterday() {
        let window = report_window(ReportKind::Weekly, date(2024, 3, 11));
        assert_eq!(window, DateWindow::new(date(2024, 3, 4), date(2024, 3, 10)));
    }

    #[test]
    fn cadence_tally_labels_missing_values_and_sorts() {
        let values = vec![
            Some("D2".to_string()),
            None,
            Some("D1".to_string()),
            Some("D2".to_string()),
        ];
        assert_eq!(
            tally_cadence(&values),
            vec![
                ("D1".to_string(), 1),
                ("D2".to_string(), 2),
                ("Desconhecido".to_string(), 1),
            ]
        );
    }

    #[test]
    fn message_includes_all_sections() {
        let counts = ReportCounts {
            new_leads: 5,
            contacted: 8,
            repassed: 3,
            cadence: vec![("D1".to_string(), 2), ("D2".to_string(), 1)],
        };
        let message = render_message(ReportKind::Daily, "12/03/2024", &counts);

        assert!(message.starts_with("📊 *Relatório Diário*\n📅 Período: 12/03/2024\n\n"));
        assert!(message.contains("🆕 *Novos Leads:* 5\n"));
        assert!(message.contains("💬 *Total Contactados:* 8\n"));
        assert!(message.contains("🔄 *Total Repasse:* 3\n"));
        assert!(message.contains("📉 *Por Dia da Cadência:*\n- D1: 2\n- D2: 1\n"));
    }

    #[test]
    fn message_falls_back_when_no_cadence_data() {
        let counts = ReportCounts {
            new_leads: 0,
            contacted: 0,
            repassed: 0,
            cadence: vec![],
        };
        let message = render_message(ReportKind::Weekly, "04/03/2024 a 10/03/2024", &counts);
        assert!(message.contains("*Relatório Semanal*"));
        assert!(message.ends_with("📉 *Por Dia da Cadência:*\nNenhum dado"));
    }

    #[test]
    fn missing_credentials_fail_fast() {
        let settings = InstanceSettings {
            id: uuid::Uuid::nil(),
            instance_name: "clinic-x".to_string(),
            api_key: "   ".to_string(),
            notification_number: "5511999999999".to_string(),
            updated_at: Utc::now(),
        };

        let err = require_credentials(&settings).unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
    }
}
