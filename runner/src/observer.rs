use engine::{ObservationSnapshot, PixelBuffer};
use harness::{Action, EpisodeSummary, FrameObserver, StepResult};
use tracing::{debug, info};

fn describe(buffer: Option<&PixelBuffer>) -> String {
    match buffer {
        Some(b) => format!("{}x{} {:?}", b.width, b.height, b.format),
        None => "absent".to_string(),
    }
}

/// Logs what is observed and submitted on every tick.
pub struct LoggingObserver;

impl FrameObserver for LoggingObserver {
    fn on_frame(&mut self, episode: u32, snapshot: &ObservationSnapshot) {
        debug!(episode, "State #{}", snapshot.number);
        debug!("Game variables: {:?}", snapshot.game_variables.values());
        debug!(
            "Labels: {:?}",
            snapshot.labels.iter().map(|l| l.object_name.as_str()).collect::<Vec<_>>()
        );
        debug!(
            "Screen: {}, depth: {}, labels: {}, automap: {}, audio frames: {}",
            describe(snapshot.screen_buffer.as_ref()),
            describe(snapshot.depth_buffer.as_ref()),
            describe(snapshot.labels_buffer.as_ref()),
            describe(snapshot.automap_buffer.as_ref()),
            snapshot.audio_buffer.as_ref().map_or(0, engine::AudioBuffer::frames)
        );
        debug!("Objects: {}, sectors: {}", snapshot.objects.len(), snapshot.sectors.len());
    }

    fn on_step(&mut self, _episode: u32, action: &Action, result: &StepResult) {
        debug!("Action: {:?} Reward: {}", action.as_slice(), result.reward);
    }

    fn on_episode_end(&mut self, summary: &EpisodeSummary) {
        info!(
            "Episode {} done: {} ticks, {} frames observed, total reward {}",
            summary.episode, summary.ticks, summary.last_frame, summary.total_reward
        );
    }
}
