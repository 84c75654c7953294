//! Score and power readouts.
//!
//! On the web these live in the host page (`#score`, `#power-bar-fill`); when
//! the page lacks them the egui overlay draws the same readouts instead.

/// CSS width for a bar fill ratio in `[0, 1]`
pub fn power_bar_width(fill: f32) -> String {
    format!("{}%", (fill.clamp(0.0, 1.0) * 100.0).round())
}

pub fn score_text(score: u32) -> String {
    score.to_string()
}

#[cfg(target_arch = "wasm32")]
pub use dom::DomHud;

#[cfg(target_arch = "wasm32")]
mod dom {
    use wasm_bindgen::JsCast;
    use web_sys::{Document, Element, HtmlElement};

    use crate::controller::FrameReport;

    pub const SCORE_ID: &str = "score";
    pub const POWER_FILL_ID: &str = "power-bar-fill";

    pub struct DomHud {
        score: Option<Element>,
        power_fill: Option<HtmlElement>,
        last: Option<(u32, f32)>,
    }

    impl DomHud {
        pub fn attach(document: &Document) -> Self {
            let score = document.get_element_by_id(SCORE_ID);
            if score.is_none() {
                tracing::warn!("#{SCORE_ID} not found, score shown in overlay");
            }
            let power_fill = document
                .get_element_by_id(POWER_FILL_ID)
                .and_then(|e| e.dyn_into::<HtmlElement>().ok());
            if power_fill.is_none() {
                tracing::warn!("#{POWER_FILL_ID} not found, power shown in overlay");
            }
            Self { score, power_fill, last: None }
        }

        pub fn is_attached(&self) -> bool {
            self.score.is_some() && self.power_fill.is_some()
        }

        /// Touch the DOM only when a readout changed
        pub fn update(&mut self, report: &FrameReport) {
            let now = (report.score, report.power_fill);
            if self.last == Some(now) {
                return;
            }
            self.last = Some(now);

            if let Some(el) = &self.score {
                el.set_text_content(Some(&super::score_text(report.score)));
            }
            if let Some(el) = &self.power_fill {
                if let Err(e) = el.style().set_property("width", &super::power_bar_width(report.power_fill)) {
                    tracing::warn!("power bar update failed: {e:?}");
                }
            }
        }
    }
}
