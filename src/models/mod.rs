use chrono::NaiveDate;
use serde::Deserialize;

/// Date format the service stores lease dates in
const ISO_DATE: &str = "%Y-%m-%d";

/// Date format shown to the user
const DISPLAY_DATE: &str = "%d/%m/%Y";

/// A unit returned by the search endpoint.
///
/// The service sends the stored unit object more or less verbatim, so besides
/// the display fields it may carry raw ISO dates and a lease history. Unknown
/// fields are ignored.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SearchRecord {
    #[serde(rename = "proprietario")]
    pub owner: String,
    #[serde(rename = "unidade")]
    pub unit: String,
    #[serde(rename = "apartamento")]
    pub apartment: String,
    #[serde(rename = "locado", default)]
    pub leased: bool,
    #[serde(rename = "locatario", default)]
    tenant: Option<String>,
    #[serde(rename = "inicio_formatado", default)]
    start_display: Option<String>,
    #[serde(rename = "fim_formatado", default)]
    end_display: Option<String>,
    #[serde(rename = "inicio", default)]
    start: Option<String>,
    #[serde(rename = "fim", default)]
    end: Option<String>,
}

/// Lease details of a leased unit, ready for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lease {
    pub tenant: String,
    pub start: String,
    pub end: String,
}

impl SearchRecord {
    /// Lease details, only for leased units.
    ///
    /// Tenant and period fields sent alongside `locado = false` are never
    /// exposed. A missing display date falls back to the raw ISO date.
    pub fn lease(&self) -> Option<Lease> {
        if !self.leased {
            return None;
        }

        Some(Lease {
            tenant: self.tenant.clone().unwrap_or_default(),
            start: display_date(self.start_display.as_deref(), self.start.as_deref()),
            end: display_date(self.end_display.as_deref(), self.end.as_deref()),
        })
    }
}

#[cfg(test)]
impl SearchRecord {
    /// A unit with no current lease
    pub fn new(
        owner: impl Into<String>,
        unit: impl Into<String>,
        apartment: impl Into<String>,
    ) -> Self {
        Self {
            owner: owner.into(),
            unit: unit.into(),
            apartment: apartment.into(),
            leased: false,
            tenant: None,
            start_display: None,
            end_display: None,
            start: None,
            end: None,
        }
    }

    /// Mark the unit as leased with pre-formatted period endpoints
    pub fn with_lease(
        mut self,
        tenant: impl Into<String>,
        start: impl Into<String>,
        end: impl Into<String>,
    ) -> Self {
        self.leased = true;
        self.tenant = Some(tenant.into());
        self.start_display = Some(start.into());
        self.end_display = Some(end.into());
        self
    }
}

fn display_date(formatted: Option<&str>, iso: Option<&str>) -> String {
    match (formatted, iso) {
        (Some(formatted), _) => formatted.to_string(),
        (None, Some(iso)) => format_date(iso),
        (None, None) => String::new(),
    }
}

/// Reformat `YYYY-MM-DD` as `DD/MM/YYYY`, leaving anything else untouched
pub fn format_date(iso: &str) -> String {
    match NaiveDate::parse_from_str(iso, ISO_DATE) {
        Ok(date) => date.format(DISPLAY_DATE).to_string(),
        Err(_) => iso.to_string(),
    }
}
