//! CSV export of leads for the dashboard download button.
//!
//! The format is fixed: a 12-column header, values wrapped in double quotes
//! only when they contain a comma (embedded quotes are left untouched, as
//! the consuming spreadsheet tooling expects), timestamps as
//! `dd/MM/yyyy HH:MM:SS`, and empty cells for missing values.

use crate::db::models::leads::Lead;
use chrono::{DateTime, Utc};

pub const CSV_HEADER: &str = "ID,Nome,Telefone,Status,Tipo de Caso,Urgência,Turno,\
Observações Clínicas,Dia Cadência,Origem,Data de Criação,Data Última Interação";

fn field(value: &str) -> String {
    if value.contains(',') {
        format!("\"{value}\"")
    } else {
        value.to_string()
    }
}

fn opt_field(value: Option<&str>) -> String {
    field(value.unwrap_or(""))
}

fn timestamp(value: Option<DateTime<Utc>>) -> String {
    value
        .map(|ts| ts.format("%d/%m/%Y %H:%M:%S").to_string())
        .unwrap_or_default()
}

pub fn leads_to_csv(leads: &[Lead]) -> String {
    let mut out = String::from(CSV_HEADER);
    out.push('\n');

    for lead in leads {
        let origem = lead.metadata().and_then(|m| m.source_app.as_deref());
        let row = [
            field(&lead.id),
            opt_field(lead.lead_name.as_deref()),
            opt_field(lead.telefone.as_deref()),
            opt_field(lead.status_lead.as_deref()),
            opt_field(lead.tipo_caso.as_deref()),
            opt_field(lead.urgencia_caso.as_deref()),
            opt_field(lead.turno_preferencia.as_deref()),
            opt_field(lead.observacoes_clinicas.as_deref()),
            opt_field(lead.dia_cadencia.as_deref()),
            opt_field(origem),
            timestamp(lead.created_at),
            timestamp(lead.data_ultima_interacao),
        ];
        out.push_str(&row.join(","));
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::leads::LeadMetadata;
    use chrono::TimeZone;
    use sqlx::types::Json;

    fn lead(id: &str) -> Lead {
        Lead {
            id: id.to_string(),
            lead_name: None,
            telefone: None,
            status_lead: None,
            tipo_caso: None,
            urgencia_caso: None,
            turno_preferencia: None,
            observacoes_clinicas: None,
            dia_cadencia: None,
            metadata: None,
            created_at: None,
            data_ultima_interacao: None,
        }
    }

    #[test]
    fn header_has_twelve_columns() {
        assert_eq!(CSV_HEADER.split(',').count(), 12);
    }

    #[test]
    fn rows_align_with_the_header() {
        let mut l = lead("abc");
        l.lead_name = Some("Maria".to_string());
        l.created_at = Some(Utc.with_ymd_and_hms(2024, 3, 12, 14, 30, 5).unwrap());

        let csv = leads_to_csv(&[l]);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].split(',').count(), 12);
        assert!(lines[1].contains("12/03/2024 14:30:05"));
    }

    #[test]
    fn values_with_commas_are_quoted() {
        let mut l = lead("abc");
        l.observacoes_clinicas = Some("dor de dente, urgente".to_string());

        let csv = leads_to_csv(&[l]);
        assert!(csv.contains("\"dor de dente, urgente\""));
    }

    #[test]
    fn embedded_quotes_are_left_untouched_without_commas() {
        let mut l = lead("abc");
        l.lead_name = Some("Maria \"Mia\"".to_string());

        let csv = leads_to_csv(&[l]);
        assert!(csv.contains("Maria \"Mia\""));
        assert!(!csv.contains("\"Maria \"Mia\"\""));
    }

    #[test]
    fn missing_values_are_empty_cells() {
        let csv = leads_to_csv(&[lead("abc")]);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[1], "abc,,,,,,,,,,,");
    }

    #[test]
    fn origin_comes_from_metadata() {
        let mut l = lead("abc");
        l.metadata = Some(Json(LeadMetadata {
            source_app: Some("Instagram".to_string()),
            ..Default::default()
        }));

        let csv = leads_to_csv(&[l]);
        assert!(csv.lines().nth(1).unwrap().contains("Instagram"));
    }
}
