//! Start command handler.

use std::future::Future;
use std::io::Write;

use anyhow::Result;
use narrate_core::{SurveyType, start_screen};
use tokio::io::AsyncBufRead;

use crate::bootstrap::CliContext;
use crate::handlers::session::{self, SessionEnd};

/// Narrate the start screen with `survey_type` selected.
pub async fn execute<R, W, Q>(
    ctx: CliContext,
    survey_type: SurveyType,
    input: R,
    out: &mut W,
    quit: Q,
) -> Result<SessionEnd>
where
    R: AsyncBufRead + Unpin,
    W: Write,
    Q: Future<Output = ()>,
{
    tracing::debug!(survey_type = survey_type.as_str(), "Narrating start screen");
    session::run(ctx, start_screen(survey_type), input, out, quit).await
}
