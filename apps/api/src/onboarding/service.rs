use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::profile::Profile;
use crate::models::timeline::{ProgressTimeline, RequiredSteps};
use crate::onboarding::mutators::ProfileUpdate;
use crate::onboarding::timeline::{mark_timeline_complete, next_step, NextStep, ProgressReport};
use crate::storage::SeekerStore;

/// Creates the empty profile and fresh timeline for a newly signed-up seeker.
pub async fn provision_seeker(
    store: &dyn SeekerStore,
    user_id: Uuid,
    required: &RequiredSteps,
) -> Result<ProgressTimeline, AppError> {
    let profile = Profile::empty(user_id);
    let timeline = ProgressTimeline::new(user_id, required);
    store.create_seeker(&profile, &timeline).await?;

    info!("Provisioned seeker {user_id}");
    Ok(timeline)
}

/// Read-modify-write for one wizard submission. The profile change and the
/// step's completed flag are committed together; a rejected update writes
/// nothing.
pub async fn record_step(
    store: &dyn SeekerStore,
    user_id: Uuid,
    update: ProfileUpdate,
) -> Result<(Profile, ProgressTimeline), AppError> {
    let mut profile = store.fetch_profile(user_id).await?;
    let mut timeline = store.fetch_timeline(user_id).await?;

    let step = update.step();
    update.apply(&mut profile)?;
    timeline.mark_completed(step);

    store.commit_step(&profile, &timeline).await?;

    info!("Recorded step {} for seeker {user_id}", step.as_str());
    Ok((profile, timeline))
}

/// Evaluates the timeline and persists `completed = true` on the first
/// evaluation that finds nothing left to do.
pub async fn evaluate_progress(
    store: &dyn SeekerStore,
    user_id: Uuid,
) -> Result<ProgressReport, AppError> {
    let mut timeline = store.fetch_timeline(user_id).await?;
    let next = next_step(&timeline);

    if next == NextStep::Complete && mark_timeline_complete(&mut timeline) {
        store.save_timeline(&timeline).await?;
        info!("Seeker {user_id} completed onboarding");
    } else if let NextStep::Pending(step) = next {
        debug!("Seeker {user_id} next step: {}", step.as_str());
    }

    Ok(ProgressReport::from(next))
}
