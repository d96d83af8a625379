use crate::models::SearchRecord;
use maud::{html, Markup, Render};

/// Shown instead of the list when a search matches nothing
pub const NO_RESULTS: &str = "Nenhuma unidade encontrada.";

const DIVIDER_STYLE: &str =
    "margin: 20px auto; border: 0; border-top: 1px dashed #ccc; max-width: 600px;";

/// Render search results as the HTML fragment for the results container.
///
/// Every field goes through maud's escaping, so service text is shown
/// verbatim rather than interpreted as markup.
pub fn render(records: &[SearchRecord]) -> String {
    ResultList(records).render().into_string()
}

/// The full content of the results container
pub struct ResultList<'a>(pub &'a [SearchRecord]);

impl Render for ResultList<'_> {
    fn render(&self) -> Markup {
        html! {
            @if self.0.is_empty() {
                p style="text-align: center;" { (NO_RESULTS) }
            } @else {
                @for record in self.0 {
                    (RecordBlock(record))
                    hr style=(DIVIDER_STYLE);
                }
            }
        }
    }
}

struct RecordBlock<'a>(&'a SearchRecord);

impl Render for RecordBlock<'_> {
    fn render(&self) -> Markup {
        let record = self.0;
        html! {
            div class="resultado-container" {
                div class="resultado-item" {
                    strong { "Proprietário:" } " " span { (record.owner) }
                }
                div class="resultado-item" {
                    strong { "Unidade:" } " " span { (record.unit) " | " (record.apartment) }
                }
                div class="resultado-item" {
                    strong { "Status:" } " " (LeaseStatus(record.leased))
                }
                @if let Some(lease) = record.lease() {
                    div class="resultado-item" {
                        strong { "Locatário:" } " " span { (lease.tenant) }
                    }
                    div class="resultado-item" {
                        strong { "Período:" } " "
                        span class="data-periodo" { (lease.start) " a " (lease.end) }
                    }
                }
            }
        }
    }
}

struct LeaseStatus(bool);

impl Render for LeaseStatus {
    fn render(&self) -> Markup {
        html! {
            @if self.0 {
                span class="status-ok" { "✅ LOCADO" }
            } @else {
                span class="status-nao" { "❌ NÃO LOCADO" }
            }
        }
    }
}
