use silverdict_core::dispatcher::QueryCommit;

use crate::events::{Completion, Screen};

pub async fn handle_completion(screen: &mut Screen, completion: Completion) {
    match completion {
        Completion::Suggestions(outcome) => {
            let applied = screen.controller.receive_suggestions(outcome);
            tracing::trace!("Suggestions: {:?}", applied);
        }
        Completion::Article(outcome) => match screen.controller.receive_article(outcome).await {
            QueryCommit::Committed(followups) => {
                for followup in followups {
                    screen.spawn_followup(followup);
                }
            }
            QueryCommit::Superseded | QueryCommit::Failed => {}
        },
        Completion::HistoryRefreshed => screen.controller.history_updated().await,
    }
}
