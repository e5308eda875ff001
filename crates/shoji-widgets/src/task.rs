#![forbid(unsafe_code)]

//! Foreground bridge for cancellable background operations.
//!
//! The worker's completion pipe and the keyboard are watched through one
//! readiness wait, so the foreground neither polls nor busy-waits. When
//! both are ready at once the completion wins: the operation already
//! finished, so cancelling it would be moot.
//!
//! Cancellation never kills the worker; it is abandoned and its eventual
//! result discarded (see [`shoji_core::task`]).

use tracing::{debug, error};

use shoji_core::error::Error;
use shoji_core::keys::Key;
use shoji_core::style::ColorPair;
use shoji_core::task::{SelectableTask, TaskError, TaskOutcome};
use shoji_render::backend::Readiness;
use shoji_render::screen::Screen;

use crate::dialog::DialogBox;
use crate::menu::error_lines;
use crate::message::MessagePanel;
use crate::row::Row;

/// Run `op` on a worker thread while watching the keyboard.
///
/// Blocks until the operation completes or a key in `cancel_keys` is
/// pressed, whichever the readiness wait reports first. Keys outside the
/// cancel set are ignored. Errors from the terminal itself (not the
/// operation) surface as `Err`.
pub fn run_cancellable<T, F>(
    screen: &Screen,
    cancel_keys: &[Key],
    op: F,
) -> Result<TaskOutcome<T>, Error>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, TaskError> + Send + 'static,
{
    let task = SelectableTask::spawn(op)?;
    loop {
        match screen.wait_ready(task.signal_fd())? {
            Readiness::Task => {
                return Ok(match task.join() {
                    Ok(value) => TaskOutcome::Completed(value),
                    Err(err) => TaskOutcome::Failed(err),
                });
            }
            Readiness::Input => {
                let key = screen.read_key()?;
                if cancel_keys.contains(&key) {
                    debug!(?key, "operator cancelled background task");
                    drop(task);
                    return Ok(TaskOutcome::Cancelled);
                }
            }
        }
    }
}

/// Run `op` behind a modal dialog with a Cancel button.
///
/// Shows `prompt` while the operation runs; Escape or Enter cancels.
/// On failure the error details are logged and displayed in a message
/// panel before the outcome is returned, so callers can simply match on
/// the outcome.
pub fn run_cancellable_dialog<T, F>(
    screen: &Screen,
    prompt: &str,
    op: F,
) -> Result<TaskOutcome<T>, Error>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, TaskError> + Send + 'static,
{
    let mut dialog = DialogBox::new(screen, vec![prompt], &["Cancel"]);
    dialog.show()?;
    let outcome = run_cancellable(screen, Key::STOP_DEFAULT, op);
    dialog.hide()?;
    drop(dialog);

    if let Ok(TaskOutcome::Failed(err)) = &outcome {
        show_task_error(screen, err)?;
    }
    outcome
}

/// Log a worker failure and show its details until acknowledged.
pub fn show_task_error(screen: &Screen, err: &TaskError) -> Result<(), Error> {
    let lines = error_lines(err);
    for line in &lines {
        error!("background task failed: {line}");
    }
    let mut rows = vec![
        Row::from(("Operation failed:", ColorPair::BlackRed)),
        Row::from(""),
    ];
    rows.extend(lines.into_iter().map(Row::from));
    MessagePanel::new(screen, rows).run()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;
    use shoji_render::backend::{TestBackend, TestProbe};

    fn screen() -> (Screen, TestProbe) {
        let (backend, probe) = TestBackend::new(60, 20);
        (Screen::new(Box::new(backend)).unwrap(), probe)
    }

    #[test]
    fn completed_task_returns_its_value() {
        let (screen, _probe) = screen();
        // No keys queued: the unscripted wait reports the task ready.
        let outcome = run_cancellable(&screen, Key::STOP_DEFAULT, || Ok(11)).unwrap();
        match outcome {
            TaskOutcome::Completed(v) => assert_eq!(v, 11),
            other => panic!("expected Completed, got {other:?}"),
        }
    }

    #[test]
    fn sleeping_then_failing_task_surfaces_failure_not_cancellation() {
        let (screen, _probe) = screen();
        let outcome: TaskOutcome<()> = run_cancellable(&screen, Key::STOP_DEFAULT, || {
            thread::sleep(Duration::from_millis(30));
            Err(TaskError::message("no such title"))
        })
        .unwrap();
        match outcome {
            TaskOutcome::Failed(err) => assert!(err.to_string().contains("no such title")),
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[test]
    fn cancel_key_abandons_the_worker() {
        let (screen, probe) = screen();
        probe.push_keys(&[Key::Escape]);
        probe.push_ready(&[Readiness::Input]);
        let outcome: TaskOutcome<()> = run_cancellable(&screen, Key::STOP_DEFAULT, || {
            thread::sleep(Duration::from_millis(200));
            Ok(())
        })
        .unwrap();
        assert!(outcome.is_cancelled());
    }

    #[test]
    fn non_cancel_keys_are_ignored_while_waiting() {
        let (screen, probe) = screen();
        probe.push_keys(&[Key::Char('x'), Key::Down]);
        probe.push_ready(&[Readiness::Input, Readiness::Input, Readiness::Task]);
        let outcome = run_cancellable(&screen, Key::STOP_DEFAULT, || Ok("done")).unwrap();
        match outcome {
            TaskOutcome::Completed(v) => assert_eq!(v, "done"),
            other => panic!("expected Completed, got {other:?}"),
        }
    }

    #[test]
    fn simultaneous_completion_and_cancel_prefers_completion() {
        let (screen, probe) = screen();
        // A cancel key is queued, but the wait reports the task first.
        probe.push_keys(&[Key::Escape]);
        probe.push_ready(&[Readiness::Task]);
        let outcome = run_cancellable(&screen, Key::STOP_DEFAULT, || Ok(1)).unwrap();
        assert!(!outcome.is_cancelled());
    }

    #[test]
    fn dialog_variant_shows_and_hides_the_dialog() {
        let (screen, probe) = screen();
        let outcome = run_cancellable_dialog(&screen, "Fetching details...", || {
            thread::sleep(Duration::from_millis(10));
            Ok(5)
        })
        .unwrap();
        match outcome {
            TaskOutcome::Completed(v) => assert_eq!(v, 5),
            other => panic!("expected Completed, got {other:?}"),
        }
        // Dialog was presented while running and cleared afterwards.
        assert!(probe.present_count() >= 2);
        assert!(!probe.last_lines().iter().any(|l| l.contains("Fetching")));
    }

    #[test]
    fn dialog_variant_presents_worker_failure() {
        let (screen, probe) = screen();
        // Ack keypress for the error panel.
        probe.push_ready(&[Readiness::Task]);
        probe.push_keys(&[Key::Enter]);
        let outcome: TaskOutcome<()> = run_cancellable_dialog(&screen, "Fetching...", || {
            Err(TaskError::message("markup changed"))
        })
        .unwrap();
        match outcome {
            TaskOutcome::Failed(err) => assert!(err.to_string().contains("markup changed")),
            other => panic!("expected Failed, got {other:?}"),
        }
    }
}
