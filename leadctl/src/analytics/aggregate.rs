//! The aggregation engine: KPIs, trend deltas, and categorical breakdowns
//! over an in-memory lead collection.

use crate::analytics::window::DateWindow;
use crate::db::models::leads::Lead;
use serde::Serialize;
use utoipa::ToSchema;

/// Label used when a lead carries no status.
pub const STATUS_UNSPECIFIED: &str = "Indefinido";
/// Label used when a lead carries no case type.
pub const CASE_TYPE_UNSPECIFIED: &str = "Não Informado";
/// Label used when a lead carries no cadence day.
pub const CADENCE_UNSPECIFIED: &str = "N/A";
/// Grouping key for leads without a creative media URL.
pub const ORGANIC_CREATIVE: &str = "organic";
/// Display name for the organic creative bucket.
const ORGANIC_CREATIVE_NAME: &str = "Orgânico";
/// Display name for creatives whose URL has no usable last segment.
const CREATIVE_FALLBACK_NAME: &str = "Criativo";
const SOURCE_PAID: &str = "Pago (Ads)";
const SOURCE_ORGANIC: &str = "Orgânico";
const SOURCE_APP_UNKNOWN: &str = "Desconhecido";

const TOP_N: usize = 5;

/// Percentage change against the previous window.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Trend {
    /// Signed, rounded label such as `+25%` or `-8%`
    pub label: String,
    pub up: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CategoryCount {
    pub label: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CreativeCount {
    /// Last path segment of the media URL, or the organic display name
    pub name: String,
    pub media_url: Option<String>,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AggregateReport {
    pub window: DateWindow,
    pub total: u64,
    pub repassed: u64,
    /// Rounded percentage of in-window leads handed over, 0 when empty
    pub engagement_rate: u32,
    pub days_in_period: i64,
    pub avg_per_day: f64,
    pub total_trend: Trend,
    pub repassed_trend: Trend,
    pub engagement_trend: Trend,
    pub by_status: Vec<CategoryCount>,
    pub by_case_type: Vec<CategoryCount>,
    pub by_cadence_day: Vec<CategoryCount>,
    pub top_creatives: Vec<CreativeCount>,
    pub top_sources: Vec<CategoryCount>,
}

/// Count items per key, preserving first-encounter key order.
pub fn group_counts<T, K, F>(items: &[T], key: F) -> Vec<(K, u64)>
where
    K: PartialEq,
    F: Fn(&T) -> K,
{
    let mut counts: Vec<(K, u64)> = Vec::new();
    for item in items {
        let k = key(item);
        match counts.iter_mut().find(|(existing, _)| *existing == k) {
            Some((_, count)) => *count += 1,
            None => counts.push((k, 1)),
        }
    }
    counts
}

/// Keep the `n` largest buckets. The sort is stable, so equal counts keep
/// their first-encounter order.
pub fn rank_top<K>(mut counts: Vec<(K, u64)>, n: usize) -> Vec<(K, u64)> {
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(n);
    counts
}

/// Percentage change of `current` against `previous`. A previous value of
/// zero reads as full growth (or no movement when current is also zero).
pub fn calculate_trend(current: i64, previous: i64) -> Trend {
    if previous == 0 {
        return Trend {
            label: if current > 0 { "+100%".to_string() } else { "0%".to_string() },
            up: true,
        };
    }

    let change = (((current - previous) as f64 / previous as f64) * 100.0).round() as i64;
    Trend {
        label: format!("{}{}%", if change >= 0 { "+" } else { "" }, change),
        up: change >= 0,
    }
}

fn engagement_rate(total: u64, repassed: u64) -> u32 {
    if total == 0 {
        return 0;
    }
    ((repassed as f64 / total as f64) * 100.0).round() as u32
}

fn in_window<'a>(leads: &'a [Lead], window: &DateWindow) -> Vec<&'a Lead> {
    leads
        .iter()
        .filter(|lead| match lead.created_at {
            Some(ts) => window.contains(ts.naive_utc()),
            None => false,
        })
        .collect()
}

fn creative_name(key: &str) -> String {
    if key == ORGANIC_CREATIVE {
        return ORGANIC_CREATIVE_NAME.to_string();
    }
    match key.rsplit('/').next() {
        Some(segment) if !segment.is_empty() => segment.to_string(),
        _ => CREATIVE_FALLBACK_NAME.to_string(),
    }
}

fn source_key(lead: &Lead) -> String {
    let metadata = lead.metadata();
    let kind = match metadata.and_then(|m| m.source_type.as_deref()) {
        Some("ad") => SOURCE_PAID,
        _ => SOURCE_ORGANIC,
    };
    let app = metadata
        .and_then(|m| m.source_app.as_deref())
        .unwrap_or(SOURCE_APP_UNKNOWN);
    format!("{kind} - {app}")
}

/// Compute the full dashboard report for one window, including trend deltas
/// against the window of equal length immediately before it.
pub fn aggregate(leads: &[Lead], window: DateWindow) -> AggregateReport {
    let current = in_window(leads, &window);
    let previous = in_window(leads, &window.previous());

    let total = current.len() as u64;
    let repassed = current.iter().filter(|lead| lead.is_repassado()).count() as u64;
    let rate = engagement_rate(total, repassed);

    let prev_total = previous.len() as u64;
    let prev_repassed = previous.iter().filter(|lead| lead.is_repassado()).count() as u64;
    let prev_rate = engagement_rate(prev_total, prev_repassed);

    let days_in_period = window.day_span();
    let avg_per_day = total as f64 / days_in_period as f64;

    let by_status = group_counts(&current, |lead| {
        lead.status_lead.clone().unwrap_or_else(|| STATUS_UNSPECIFIED.to_string())
    })
    .into_iter()
    .map(|(label, count)| CategoryCount { label, count })
    .collect();

    let by_case_type = group_counts(&current, |lead| {
        lead.tipo_caso.clone().unwrap_or_else(|| CASE_TYPE_UNSPECIFIED.to_string())
    })
    .into_iter()
    .map(|(label, count)| CategoryCount { label, count })
    .collect();

    let by_cadence_day = group_counts(&current, |lead| {
        lead.dia_cadencia.clone().unwrap_or_else(|| CADENCE_UNSPECIFIED.to_string())
    })
    .into_iter()
    .map(|(label, count)| CategoryCount { label, count })
    .collect();

    let creative_counts = group_counts(&current, |lead| {
        lead.metadata()
            .and_then(|m| m.media_url.clone())
            .unwrap_or_else(|| ORGANIC_CREATIVE.to_string())
    });
    let top_creatives = rank_top(creative_counts, TOP_N)
        .into_iter()
        .map(|(key, count)| CreativeCount {
            name: creative_name(&key),
            media_url: if key == ORGANIC_CREATIVE { None } else { Some(key) },
            count,
        })
        .collect();

    let source_counts = group_counts(&current, |lead| source_key(lead));
    let top_sources = rank_top(source_counts, TOP_N)
        .into_iter()
        .map(|(label, count)| CategoryCount { label, count })
        .collect();

    AggregateReport {
        window,
        total,
        repassed,
        engagement_rate: rate,
        days_in_period,
        avg_per_day,
        total_trend: calculate_trend(total as i64, prev_total as i64),
        repassed_trend: calculate_trend(repassed as i64, prev_repassed as i64),
        engagement_trend: calculate_trend(rate as i64, prev_rate as i64),
        by_status,
        by_case_type,
        by_cadence_day,
        top_creatives,
        top_sources,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::leads::LeadMetadata;
    use chrono::{DateTime, NaiveDate, TimeZone, Utc};

    fn ts(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn lead(id: &str, created_at: Option<DateTime<Utc>>, status: Option<&str>) -> Lead {
        Lead {
            id: id.to_string(),
            lead_name: None,
            telefone: None,
            status_lead: status.map(String::from),
            tipo_caso: None,
            urgencia_caso: None,
            turno_preferencia: None,
            observacoes_clinicas: None,
            dia_cadencia: None,
            metadata: None,
            created_at,
            data_ultima_interacao: None,
        }
    }

    fn with_metadata(mut base: Lead, metadata: LeadMetadata) -> Lead {
        base.metadata = Some(sqlx::types::Json(metadata));
        base
    }

    fn window(y: i32, m: u32, d1: u32, d2: u32) -> DateWindow {
        DateWindow::new(
            NaiveDate::from_ymd_opt(y, m, d1).unwrap(),
            NaiveDate::from_ymd_opt(y, m, d2).unwrap(),
        )
    }

    #[test]
    fn kpis_for_a_two_day_window() {
        let leads = vec![
            lead("a", Some(ts(2024, 1, 1, 10)), Some("novo")),
            lead("b", Some(ts(2024, 1, 2, 18)), Some("repassado")),
            lead("c", Some(ts(2024, 1, 5, 9)), Some("repassado")),
        ];

        let report = aggregate(&leads, window(2024, 1, 1, 2));

        assert_eq!(report.total, 2);
        assert_eq!(report.repassed, 1);
        assert_eq!(report.engagement_rate, 50);
        assert_eq!(report.days_in_period, 2);
        assert!((report.avg_per_day - 1.0).abs() < f64::EPSILON);
        assert_eq!(format!("{:.1}", report.avg_per_day), "1.0");
    }

    #[test]
    fn leads_without_creation_timestamp_are_excluded() {
        let leads = vec![
            lead("a", Some(ts(2024, 1, 1, 10)), Some("novo")),
            lead("b", None, Some("novo")),
        ];

        let report = aggregate(&leads, window(2024, 1, 1, 2));
        assert_eq!(report.total, 1);
    }

    #[test]
    fn empty_window_yields_zeroed_kpis() {
        let report = aggregate(&[], window(2024, 1, 1, 7));
        assert_eq!(report.total, 0);
        assert_eq!(report.engagement_rate, 0);
        assert_eq!(report.total_trend.label, "0%");
        assert!(report.total_trend.up);
    }

    #[test]
    fn trend_with_zero_previous_reads_as_full_growth() {
        let t = calculate_trend(5, 0);
        assert_eq!(t.label, "+100%");
        assert!(t.up);

        let t = calculate_trend(0, 0);
        assert_eq!(t.label, "0%");
        assert!(t.up);
    }

    #[test]
    fn trend_is_signed_and_rounded() {
        assert_eq!(calculate_trend(15, 10), Trend { label: "+50%".to_string(), up: true });
        assert_eq!(calculate_trend(5, 10), Trend { label: "-50%".to_string(), up: false });
        assert_eq!(calculate_trend(10, 10), Trend { label: "+0%".to_string(), up: true });
        // 1/3 growth rounds to +33%
        assert_eq!(calculate_trend(4, 3).label, "+33%");
    }

    #[test]
    fn trends_compare_against_the_preceding_window() {
        // Previous window (Jan 1-2): 1 lead. Current window (Jan 3-4): 2 leads.
        let leads = vec![
            lead("a", Some(ts(2024, 1, 1, 12)), Some("novo")),
            lead("b", Some(ts(2024, 1, 3, 12)), Some("novo")),
            lead("c", Some(ts(2024, 1, 4, 12)), Some("repassado")),
        ];

        let report = aggregate(&leads, window(2024, 1, 3, 4));
        assert_eq!(report.total_trend, Trend { label: "+100%".to_string(), up: true });
        // Previous window had zero repassados
        assert_eq!(report.repassed_trend, Trend { label: "+100%".to_string(), up: true });
    }

    #[test]
    fn statuses_fall_back_to_the_unspecified_label() {
        let leads = vec![
            lead("a", Some(ts(2024, 1, 1, 1)), None),
            lead("b", Some(ts(2024, 1, 1, 2)), Some("novo")),
            lead("c", Some(ts(2024, 1, 1, 3)), None),
        ];

        let report = aggregate(&leads, window(2024, 1, 1, 1));
        assert_eq!(
            report.by_status,
            vec![
                CategoryCount { label: STATUS_UNSPECIFIED.to_string(), count: 2 },
                CategoryCount { label: "novo".to_string(), count: 1 },
            ]
        );
    }

    #[test]
    fn group_counts_preserves_first_encounter_order() {
        let items = ["b", "a", "b", "c", "a", "b"];
        let counts = group_counts(&items, |s| s.to_string());
        assert_eq!(
            counts,
            vec![("b".to_string(), 3), ("a".to_string(), 2), ("c".to_string(), 1)]
        );
    }

    #[test]
    fn rank_top_breaks_ties_by_first_encounter() {
        let counts = vec![
            ("x".to_string(), 2),
            ("y".to_string(), 3),
            ("z".to_string(), 2),
        ];
        let ranked = rank_top(counts, 2);
        assert_eq!(ranked, vec![("y".to_string(), 3), ("x".to_string(), 2)]);
    }

    #[test]
    fn creatives_bucket_missing_media_urls_as_organic() {
        let meta_url = LeadMetadata {
            media_url: Some("https://cdn.example.com/ads/video-42.mp4".to_string()),
            ..Default::default()
        };
        let leads = vec![
            with_metadata(lead("a", Some(ts(2024, 1, 1, 1)), None), meta_url.clone()),
            with_metadata(lead("b", Some(ts(2024, 1, 1, 2)), None), meta_url),
            lead("c", Some(ts(2024, 1, 1, 3)), None),
        ];

        let report = aggregate(&leads, window(2024, 1, 1, 1));
        assert_eq!(report.top_creatives.len(), 2);
        assert_eq!(report.top_creatives[0].name, "video-42.mp4");
        assert_eq!(
            report.top_creatives[0].media_url.as_deref(),
            Some("https://cdn.example.com/ads/video-42.mp4")
        );
        assert_eq!(report.top_creatives[0].count, 2);
        assert_eq!(report.top_creatives[1].name, "Orgânico");
        assert_eq!(report.top_creatives[1].media_url, None);
    }

    #[test]
    fn creative_url_without_a_last_segment_gets_a_fallback_name() {
        let meta = LeadMetadata {
            media_url: Some("https://cdn.example.com/ads/".to_string()),
            ..Default::default()
        };
        let leads = vec![with_metadata(lead("a", Some(ts(2024, 1, 1, 1)), None), meta)];

        let report = aggregate(&leads, window(2024, 1, 1, 1));
        assert_eq!(report.top_creatives[0].name, "Criativo");
        assert_eq!(
            report.top_creatives[0].media_url.as_deref(),
            Some("https://cdn.example.com/ads/")
        );
    }

    #[test]
    fn category_counts_sum_to_the_filtered_total() {
        let leads = vec![
            lead("a", Some(ts(2024, 1, 1, 1)), Some("novo")),
            lead("b", Some(ts(2024, 1, 1, 2)), Some("repassado")),
            lead("c", Some(ts(2024, 1, 2, 3)), None),
            lead("d", Some(ts(2024, 1, 2, 4)), Some("novo")),
            // Outside the window, must not count anywhere
            lead("e", Some(ts(2024, 1, 9, 5)), Some("novo")),
        ];

        let report = aggregate(&leads, window(2024, 1, 1, 2));
        assert_eq!(report.total, 4);
        for category in [&report.by_status, &report.by_case_type, &report.by_cadence_day] {
            let sum: u64 = category.iter().map(|bucket| bucket.count).sum();
            assert_eq!(sum, report.total);
        }
    }

    #[test]
    fn sources_combine_traffic_kind_and_app() {
        let paid = LeadMetadata {
            source_type: Some("ad".to_string()),
            source_app: Some("Instagram".to_string()),
            ..Default::default()
        };
        let organic_no_app = LeadMetadata::default();

        let leads = vec![
            with_metadata(lead("a", Some(ts(2024, 1, 1, 1)), None), paid.clone()),
            with_metadata(lead("b", Some(ts(2024, 1, 1, 2)), None), paid),
            with_metadata(lead("c", Some(ts(2024, 1, 1, 3)), None), organic_no_app),
            lead("d", Some(ts(2024, 1, 1, 4)), None),
        ];

        let report = aggregate(&leads, window(2024, 1, 1, 1));
        assert_eq!(
            report.top_sources,
            vec![
                CategoryCount { label: "Pago (Ads) - Instagram".to_string(), count: 2 },
                CategoryCount { label: "Orgânico - Desconhecido".to_string(), count: 2 },
            ]
        );
    }

    #[test]
    fn top_lists_are_capped_at_five() {
        let mut leads = Vec::new();
        for i in 0..7 {
            let meta = LeadMetadata {
                media_url: Some(format!("https://cdn.example.com/ads/{i}.mp4")),
                ..Default::default()
            };
            leads.push(with_metadata(lead(&format!("l{i}"), Some(ts(2024, 1, 1, 1)), None), meta));
        }

        let report = aggregate(&leads, window(2024, 1, 1, 1));
        assert_eq!(report.top_creatives.len(), 5);
    }
}
