use std::time::Duration;

use async_trait::async_trait;

use super::form::{ConversionResult, PendingConversion};

pub const DEFAULT_DELAY: Duration = Duration::from_millis(1000);

/// Decides how long a requested conversion waits before it resolves.
#[async_trait]
pub trait Scheduler: Send + Sync {
    async fn wait(&self);
}

/// Waits a fixed, uncancellable duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedDelay(pub Duration);

impl Default for FixedDelay {
    fn default() -> Self {
        FixedDelay(DEFAULT_DELAY)
    }
}

#[async_trait]
impl Scheduler for FixedDelay {
    async fn wait(&self) {
        tokio::time::sleep(self.0).await;
    }
}

/// Resolves straight away.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Immediate;

#[async_trait]
impl Scheduler for Immediate {
    async fn wait(&self) {}
}

#[tracing::instrument(skip_all, fields(direction = %pending.direction))]
pub async fn run_conversion(
    pending: PendingConversion,
    scheduler: &dyn Scheduler,
) -> ConversionResult {
    scheduler.wait().await;
    let result = pending.evaluate();
    log::info!("conversion finished: {result:?}");
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::form::{ConversionForm, Field};
    use pretty_assertions::assert_eq;
    use tokio::time::Instant;

    fn filled_form() -> ConversionForm {
        let mut form = ConversionForm::default();
        form.update_field(Field::Easting, "500000");
        form.update_field(Field::Northing, "1000000");
        form
    }

    #[tokio::test(start_paused = true)]
    async fn fixed_delay_waits_a_full_second() {
        let mut form = filled_form();
        let pending = form.begin_conversion();

        let started = Instant::now();
        let result = run_conversion(pending, &FixedDelay::default()).await;
        assert!(started.elapsed() >= Duration::from_millis(1000));

        assert!(form.is_busy());
        form.finish_conversion(result);
        assert!(!form.is_busy());
        assert_eq!(
            form.result(),
            Some(&ConversionResult::Geographic {
                latitude: "8.983112".to_string(),
                longitude: "4.491556".to_string(),
            })
        );
    }

    #[tokio::test(start_paused = true)]
    async fn immediate_does_not_advance_time() {
        let mut form = filled_form();
        form.update_field(Field::Northing, "");
        let pending = form.begin_conversion();

        let started = Instant::now();
        let result = run_conversion(pending, &Immediate).await;
        assert_eq!(started.elapsed(), Duration::ZERO);
        assert_eq!(result, ConversionResult::MissingInput);
    }

    #[tokio::test(start_paused = true)]
    async fn result_arrives_only_after_the_delay() {
        let mut form = filled_form();
        let pending = form.begin_conversion();
        let task =
            tokio::spawn(async move { run_conversion(pending, &FixedDelay::default()).await });

        tokio::time::sleep(Duration::from_millis(999)).await;
        assert!(!task.is_finished());

        let result = task.await.expect("conversion task panicked");
        assert!(matches!(result, ConversionResult::Geographic { .. }));
    }
}
