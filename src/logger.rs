use std::sync::{Arc, Mutex};

use tracing::Subscriber;
use tracing_subscriber::{
    filter::LevelFilter,
    layer::Context,
    prelude::*,
    registry::LookupSpan,
    Layer,
};

///////////////////////////////////////////////////////////////////////////////
//                                  Logging                                  //
///////////////////////////////////////////////////////////////////////////////

/// Installs the global stderr subscriber. Each `-v` raises the level by one step from WARN.
pub fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(level);

    // ignore the error if a subscriber is already installed
    let _ = tracing_subscriber::registry().with(fmt_layer).try_init();
}

/// Holds a single log entry
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub level: tracing::Level,
    pub target: String,
    pub message: String,
}

/// Type-alias for storage for logs
pub type LogStorage = Arc<Mutex<Vec<LogEntry>>>;

// Memory Layer ///////////////////////////////////////////////////////////////

/// Custom tracing layer that captures logs to memory
pub struct MemoryLayer {
    storage: LogStorage,
}

impl MemoryLayer {
    pub fn new(storage: LogStorage) -> Self {
        Self { storage }
    }
}

/// impl adding new entry to MemoryLayer.LogStorage upon receiving a tracing event
impl<S> Layer<S> for MemoryLayer
where
    S: Subscriber + for<'lookup> LookupSpan<'lookup>,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = FieldVisitor::new();
        event.record(&mut visitor);

        let entry = LogEntry {
            level: *event.metadata().level(),
            target: event.metadata().target().to_string(),
            message: visitor.finish(),
        };

        // lock mutex and push new entry to LogStorage
        if let Ok(mut logs) = self.storage.lock() {
            logs.push(entry);
        }
    }
}

// Field Visitor //////////////////////////////////////////////////////////////

/// Visitor flattening an event into `message key=value ...`
struct FieldVisitor {
    message: String,
    fields: Vec<String>,
}

impl FieldVisitor {
    pub fn new() -> Self {
        Self {
            message: String::new(),
            fields: vec![],
        }
    }

    fn finish(self) -> String {
        std::iter::once(self.message)
            .chain(self.fields)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value);
        } else {
            self.fields.push(format!("{}={:?}", field.name(), value));
        }
    }
}

// Logger /////////////////////////////////////////////////////////////////////

/// Scoped subscriber recording every event on the current thread until dropped.
pub struct Logger {
    _guard: tracing::subscriber::DefaultGuard,
    pub storage: LogStorage,
}

impl Logger {
    pub fn capture() -> Self {
        let storage = Arc::new(Mutex::new(Vec::new()));
        let memory_layer = MemoryLayer::new(storage.clone());
        let subscriber = tracing_subscriber::registry().with(memory_layer);
        let guard = tracing::subscriber::set_default(subscriber);

        Self {
            _guard: guard,
            storage,
        }
    }

    /// Messages captured so far.
    pub fn messages(&self) -> Vec<String> {
        self.storage
            .lock()
            .map(|logs| logs.iter().map(|e| e.message.clone()).collect())
            .unwrap_or_default()
    }
}
