use std::collections::HashSet;

use log::{error, info, warn};
use tokio::sync::Mutex;

use crate::backend::client::Backend;
use crate::backend::types::AnalysisText;
use crate::error_handling::types::FlowError;
use crate::storage::image_store::ImageStore;

/// Terminal state of an analysis request, shown to the user either way.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    Completed { analysis: String, text_count: usize },
    Failed { message: String },
}

/// Sends every successfully extracted text to the backend in one batch.
///
/// With no eligible text the backend is not called and `NothingToAnalyze` is
/// returned. A backend failure is an `AnalysisOutcome::Failed`, not an `Err`.
/// On success the analysis is attached to each contributing item.
pub async fn analyze_texts(
    store: &Mutex<ImageStore>,
    backend: &dyn Backend,
) -> Result<AnalysisOutcome, FlowError> {
    let (ids, texts): (Vec<String>, Vec<AnalysisText>) = store
        .lock()
        .await
        .items()
        .iter()
        .filter_map(|i| {
            i.analyzable_text().map(|text| {
                (
                    i.id.clone(),
                    AnalysisText {
                        text: text.to_string(),
                        timestamp: i.timestamp,
                    },
                )
            })
        })
        .unzip();

    if texts.is_empty() {
        return Err(FlowError::NothingToAnalyze);
    }

    info!("Analyzing {} text(s)", texts.len());
    let analysis = match backend.analyze_texts(&texts).await {
        Ok(analysis) => analysis,
        Err(e) => {
            warn!("Analysis failed: {}", e);
            return Ok(AnalysisOutcome::Failed {
                message: e.to_string(),
            });
        }
    };

    let contributors: HashSet<String> = ids.into_iter().collect();
    let attached = store.lock().await.update_all(|item| {
        if contributors.contains(&item.id) {
            item.analysis = Some(analysis.clone());
            true
        } else {
            false
        }
    });
    if let Err(e) = attached {
        // the result is still shown; it just won't survive a reload
        error!("Could not persist the analysis: {}", e);
    }

    Ok(AnalysisOutcome::Completed {
        analysis,
        text_count: texts.len(),
    })
}
