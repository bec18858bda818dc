use log::{info, warn};

use crate::render::{scene::Circle, view::CanvasView};

fn describe_circle(circle: &Circle) -> String {
    let position = format!("({:.1}, {:.1})", circle.center.x, circle.center.y);
    if circle.visible {
        position
    } else {
        format!("{position} hidden")
    }
}

/// One line per frame: the seed, then every cached circle by index.
pub fn describe(view: &CanvasView) -> String {
    let seed = view
        .seed()
        .map(describe_circle)
        .unwrap_or_else(|| "none".to_string());
    let shapes = (0..view.cache_len())
        .filter_map(|index| view.shape(index))
        .map(describe_circle)
        .collect::<Vec<_>>()
        .join(" ");
    format!("seed {seed} | {shapes}")
}

/// Logs every reconciled frame. Returns the number of frames logged.
///
/// Stops after `updates` frames (0 means no limit), on Ctrl-C, or when the
/// producer side of the channel goes away.
pub async fn run_headless(mut view: CanvasView, updates: u64) -> u64 {
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut frames = 0;
    loop {
        tokio::select! {
            applied = view.next() => match applied {
                None => {
                    warn!(
                        "state channel closed with {} values pending",
                        view.latest().values.len()
                    );
                    break;
                }
                Some(false) => {}
                Some(true) => {
                    frames += 1;
                    info!(
                        "frame {frames}: {} values -> {}",
                        view.values_len(),
                        describe(&view)
                    );
                    if updates > 0 && frames >= updates {
                        break;
                    }
                }
            },
            _ = &mut ctrl_c => {
                info!("interrupted");
                break;
            }
        }
    }
    frames
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::Config,
        data::{
            signal::{Producer, Shutdown},
            state_channel, State,
        },
        render::ShrinkPolicy,
    };

    #[test]
    fn describes_seed_then_value_circles() {
        let config = Config::default();
        let (publisher, subscriber) = state_channel(State::default());
        let mut view = CanvasView::new(&config, subscriber);
        publisher.publish(State::new(vec![100.0, 125.5]));
        view.sync();

        assert_eq!(
            describe(&view),
            "seed (980.0, 20.0) | (1000.0, 100.0) (940.0, 125.5)"
        );
    }

    #[test]
    fn marks_hidden_circles() {
        let mut config = Config::default();
        config.renderer.shrink = ShrinkPolicy::Hide;
        let (publisher, subscriber) = state_channel(State::default());
        let mut view = CanvasView::new(&config, subscriber);
        publisher.publish(State::new(vec![100.0, 200.0]));
        view.sync();
        publisher.publish(State::new(vec![50.0]));
        view.sync();

        assert_eq!(
            describe(&view),
            "seed (980.0, 20.0) | (1000.0, 50.0) (940.0, 200.0) hidden"
        );
    }

    #[test_log::test(tokio::test(start_paused = true))]
    async fn stops_after_the_requested_number_of_frames() {
        let config = Config::default();
        let (publisher, subscriber) = state_channel(State::default());
        let view = CanvasView::new(&config, subscriber);
        let shutdown = Shutdown::new();
        let producer = tokio::spawn(Producer::new(&config.producer, publisher).run(shutdown.signal()));

        assert_eq!(run_headless(view, 3).await, 3);

        shutdown.trigger();
        producer.await.unwrap();
    }

    #[tokio::test]
    async fn stops_when_the_publisher_goes_away() {
        let config = Config::default();
        let (publisher, subscriber) = state_channel(State::default());
        let view = CanvasView::new(&config, subscriber);
        publisher.publish(State::new(vec![1.0]));
        drop(publisher);

        assert_eq!(run_headless(view, 0).await, 1);
    }

    #[tokio::test]
    async fn keeps_listening_across_frames() {
        let config = Config::default();
        let (publisher, subscriber) = state_channel(State::default());
        let mut view = CanvasView::new(&config, subscriber);
        publisher.publish(State::new(vec![3.0]));
        assert_eq!(view.next().await, Some(true));
        assert_eq!(view.latest().values, vec![3.0]);

        let task = tokio::spawn(run_headless(view, 2));
        publisher.publish(State::new(vec![4.0]));
        tokio::task::yield_now().await;
        publisher.publish(State::new(vec![5.0, 4.0]));
        drop(publisher);
        assert_eq!(task.await.unwrap(), 2);
    }
}
