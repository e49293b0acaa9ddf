//! Game rules: one guess per identity, first submission final.

use crate::error::Error;
use chrono::Utc;
use log::*;
use service::store::{ResultStore, ResultSummary, ResultsFile, StoredResult, SubmissionOutcome};

/// Normalization applied to both the guess and the target word before the
/// winning check: surrounding whitespace dropped, lowercased.
pub fn normalize(word: &str) -> String {
    word.trim().to_lowercase()
}

/// Records a first submission, or returns the existing one untouched.
///
/// Idempotent on repeat: a login that already has a recorded result gets it
/// back with `already_submitted: true` and no mutation, whatever the new word
/// is. The whole load-mutate-save cycle runs under the store's write lock so
/// two racing first submissions cannot lose one another's write.
pub async fn record_first_submission(
    store: &ResultStore,
    login: &str,
    word: &str,
    target_word: &str,
) -> Result<SubmissionOutcome, Error> {
    let _guard = store.lock().await;
    let mut file = store.load().await?;

    if let Some(existing) = file.users.get(login) {
        debug!("Repeat submission from {login}, returning the recorded result");
        return Ok(SubmissionOutcome {
            already_submitted: true,
            result: existing.clone(),
        });
    }

    let win = normalize(word) == normalize(target_word);
    let result = StoredResult {
        win,
        word: word.trim().to_string(),
        at: Utc::now(),
    };

    file.users.insert(login.to_string(), result.clone());
    store.save(&file).await?;

    info!("Recorded submission for {login} (win: {win})");
    Ok(SubmissionOutcome {
        already_submitted: false,
        result,
    })
}

/// Scoreboard projection, ordered by login. Drops the submitted word; the
/// word is private to the submitter.
pub async fn summary(store: &ResultStore) -> Result<Vec<ResultSummary>, Error> {
    let file: ResultsFile = store.load().await?;
    Ok(file
        .users
        .into_iter()
        .map(|(login, result)| ResultSummary {
            login,
            win: result.win,
        })
        .collect())
}
