//! Test capture mode for deterministic logging assertions
//!
//! This module provides a test-only subscriber that captures log events in
//! memory, together with the fields of every span enclosing the event, so
//! that records written through [`TracingSink`](crate::sink::TracingSink)
//! can be asserted on including their operation scope.

use optime_core_types::schema::FIELD_OUTCOME;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};
use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Id, Record};
use tracing::{Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

/// A captured log event with all its fields
#[derive(Clone, Debug)]
pub struct CapturedEvent {
    pub level: Level,
    pub target: String,
    pub message: Option<String>,
    pub outcome: Option<String>,
    pub fields: HashMap<String, String>,
    /// Fields of enclosing spans, outermost first
    pub spans: Vec<HashMap<String, String>>,
}

impl CapturedEvent {
    /// Look a field up in the enclosing spans, innermost first
    pub fn span_field(&self, name: &str) -> Option<&str> {
        self.spans
            .iter()
            .rev()
            .find_map(|fields| fields.get(name))
            .map(String::as_str)
    }
}

struct FieldVisitor<'a> {
    fields: &'a mut HashMap<String, String>,
}

impl Visit for FieldVisitor<'_> {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.fields
            .insert(field.name().to_string(), format!("{:?}", value));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.fields
            .insert(field.name().to_string(), value.to_string());
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.fields
            .insert(field.name().to_string(), value.to_string());
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.fields
            .insert(field.name().to_string(), value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.fields
            .insert(field.name().to_string(), value.to_string());
    }
}

/// Span fields stored in the registry's span extensions
#[derive(Default)]
struct SpanFields(HashMap<String, String>);

/// Test capture layer for collecting log events
pub struct TestCaptureLayer {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl TestCaptureLayer {
    pub fn new() -> (Self, TestCapture) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let layer = Self {
            events: events.clone(),
        };
        let capture = TestCapture { events };
        (layer, capture)
    }
}

impl<S> Layer<S> for TestCaptureLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        let mut fields = SpanFields::default();
        attrs.record(&mut FieldVisitor {
            fields: &mut fields.0,
        });
        if let Some(span) = ctx.span(id) {
            span.extensions_mut().insert(fields);
        }
    }

    fn on_record(&self, id: &Id, values: &Record<'_>, ctx: Context<'_, S>) {
        if let Some(span) = ctx.span(id) {
            let mut extensions = span.extensions_mut();
            if let Some(fields) = extensions.get_mut::<SpanFields>() {
                values.record(&mut FieldVisitor {
                    fields: &mut fields.0,
                });
            }
        }
    }

    fn on_event(&self, event: &tracing::Event<'_>, ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let mut fields = HashMap::new();
        event.record(&mut FieldVisitor {
            fields: &mut fields,
        });

        let spans = ctx
            .event_scope(event)
            .map(|scope| {
                scope
                    .from_root()
                    .map(|span| {
                        span.extensions()
                            .get::<SpanFields>()
                            .map(|f| f.0.clone())
                            .unwrap_or_default()
                    })
                    .collect()
            })
            .unwrap_or_default();

        let captured = CapturedEvent {
            level: *metadata.level(),
            target: metadata.target().to_string(),
            message: fields.get("message").cloned(),
            outcome: fields.get(FIELD_OUTCOME).cloned(),
            fields,
            spans,
        };

        self.events
            .lock()
            .map(|mut events| events.push(captured))
            .ok();
    }
}

/// Handle for accessing captured events in tests
#[derive(Clone)]
pub struct TestCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl TestCapture {
    /// Get all captured events
    pub fn events(&self) -> Vec<CapturedEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Operation records whose message starts with `prefix`
    pub fn operation_events(&self, prefix: &str) -> Vec<CapturedEvent> {
        self.events()
            .into_iter()
            .filter(|e| {
                e.outcome.is_some()
                    && e.message.as_deref().is_some_and(|m| m.starts_with(prefix))
            })
            .collect()
    }

    /// Assert that an operation record exists with the given message prefix and outcome
    ///
    /// # Panics
    ///
    /// Panics if the event is not found
    pub fn assert_outcome(&self, prefix: &str, outcome: &str) {
        let events = self.operation_events(prefix);
        let found = events
            .iter()
            .any(|e| e.outcome.as_deref() == Some(outcome));
        assert!(
            found,
            "Expected operation '{}' with outcome {} not found in {} matching events",
            prefix,
            outcome,
            events.len()
        );
    }

    /// Clear all captured events
    pub fn clear(&self) {
        self.events.lock().map(|mut e| e.clear()).ok();
    }

    /// Count events matching a predicate
    pub fn count_events<F>(&self, predicate: F) -> usize
    where
        F: Fn(&CapturedEvent) -> bool,
    {
        self.events().iter().filter(|e| predicate(e)).count()
    }
}

static GLOBAL_CAPTURE: OnceLock<TestCapture> = OnceLock::new();

/// Initialize test capture mode
///
/// Installs the capture layer as the global default subscriber on first
/// use and returns a handle to the shared capture. Tests running in parallel
/// share it, so filter by a unique message prefix.
///
/// # Example
///
/// ```
/// use optime_core::logging_facility::test_capture::init_test_capture;
/// use optime_core::{op_args, Logger};
///
/// let capture = init_test_capture();
/// let logger = Logger::tracing();
/// drop(logger.time_operation("doc capture example", op_args![]));
/// capture.assert_outcome("doc capture example", "completed");
/// ```
pub fn init_test_capture() -> TestCapture {
    GLOBAL_CAPTURE
        .get_or_init(|| {
            let (layer, capture) = TestCaptureLayer::new();
            let _ = tracing_subscriber::registry().with(layer).try_init();
            capture
        })
        .clone()
}
