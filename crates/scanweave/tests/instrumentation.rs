//! Event instrumentation tests.
//!
//! Verifies that engine failures surface as warn-level events, keeping a
//! broken engine observable without aborting the conversion.

use scanweave::{LocalEngineConfig, RecognitionEngine, RecognitionInput};
use scanweave::engines::LocalEngine;
use std::sync::{Arc, Mutex};
use tracing::Subscriber;
use tracing_subscriber::Layer;
use tracing_subscriber::layer::{Context, SubscriberExt};

/// Collects event levels and messages as they are emitted.
struct EventCollector {
    events: Arc<Mutex<Vec<(String, String)>>>,
}

impl<S: Subscriber> Layer<S> for EventCollector {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor(String::new());
        event.record(&mut visitor);
        self.events
            .lock()
            .unwrap()
            .push((event.metadata().level().to_string(), visitor.0));
    }
}

struct MessageVisitor(String);

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{:?}", value);
        }
    }
}

#[tokio::test]
async fn test_local_engine_failure_emits_warn_event() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let collector = EventCollector { events: events.clone() };

    let subscriber = tracing_subscriber::registry().with(collector);
    let _guard = tracing::subscriber::set_default(subscriber);

    let config = LocalEngineConfig {
        binary_path: "/nonexistent/scanweave-test-tesseract".to_string(),
        ..Default::default()
    };
    let engine = LocalEngine::new(config);

    let input = RecognitionInput {
        image: Arc::new(image::GrayImage::from_pixel(8, 8, image::Luma([255u8]))),
        jpeg: Arc::new(Vec::new()),
        language: "spa".to_string(),
    };

    let result = engine.recognize(&input).await;
    assert!(!result.succeeded);

    let events = events.lock().unwrap();
    assert!(
        events
            .iter()
            .any(|(level, message)| level == "WARN" && message.contains("local engine failed")),
        "expected a warn event for the missing binary, got: {:?}",
        *events
    );
}
