use crate::core::session::{self, Action, Effect, FormContext, FormState, Notice, View};
use crate::domain::ports::ReportExporter;
use crate::utils::error::Result;
use chrono::{Local, NaiveDateTime};

/// Owns one session: its form state, the shared context and the exporter
/// that carries out report effects.
pub struct FormEngine<E: ReportExporter> {
    ctx: FormContext,
    state: FormState,
    exporter: E,
}

impl<E: ReportExporter> FormEngine<E> {
    pub fn new(ctx: FormContext, exporter: E) -> Self {
        let state = FormState::new(Local::now().date_naive());
        Self::with_state(ctx, state, exporter)
    }

    pub fn with_state(ctx: FormContext, state: FormState, exporter: E) -> Self {
        Self {
            ctx,
            state,
            exporter,
        }
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn view(&self) -> View {
        View::render(&self.state, self.ctx.variant, Local::now().naive_local())
    }

    pub async fn dispatch(&mut self, action: Action) -> Result<View> {
        self.dispatch_at(action, Local::now().naive_local()).await
    }

    /// Applies `action` as of `now`. Form rejections are reported through
    /// the view's notice; only a failed export is returned as an error, in
    /// which case the entered products are kept so the user can retry.
    pub async fn dispatch_at(&mut self, action: Action, now: NaiveDateTime) -> Result<View> {
        tracing::debug!("Dispatching {:?}", action);

        let transition = session::update(self.state.clone(), action, &self.ctx, now);
        self.state = transition.state;

        if let Some(err) = &transition.error {
            tracing::warn!("⚠️ {}", err);
        }

        match transition.effect {
            None => Ok(transition.view),
            Some(Effect::ExportReport(report)) => {
                tracing::info!("Generating report with {} products", report.blocks.len());
                match self.exporter.export(&report).await {
                    Ok(location) => {
                        tracing::info!("📁 Report saved to: {}", location);
                        self.state.notice = Some(Notice::success(format!(
                            "Report generated successfully: {}",
                            location
                        )));
                        Ok(View::render(&self.state, self.ctx.variant, now))
                    }
                    Err(e) => {
                        tracing::error!("❌ Report export failed: {}", e);
                        self.state.notice = Some(Notice::error(format!(
                            "Report could not be written: {}",
                            e
                        )));
                        Err(e)
                    }
                }
            }
        }
    }
}
