use tracing_subscriber::prelude::*;

// Drops spans that recorded no events, so that member-call spans don't flood the output.
struct QuietSpans<P>(P);

impl<P: tracing_forest::Processor> tracing_forest::Processor for QuietSpans<P> {
    fn process(&self, tree: tracing_forest::tree::Tree) -> tracing_forest::processor::Result {
        fn has_events(tree: &tracing_forest::tree::Tree) -> bool {
            match tree {
                tracing_forest::tree::Tree::Span(span) => span.nodes().iter().any(has_events),
                tracing_forest::tree::Tree::Event(_) => true,
            }
        }

        if has_events(&tree) {
            self.0.process(tree)
        } else {
            Ok(())
        }
    }
}

fn module_icon(module: &str) -> Option<char> {
    Some(match module.split("::").next()? {
        "client" => '📡',
        "capability" => '🧩',
        "emulation" => '🔀',
        "api" => '🔭',
        "test" => '🧪',
        _ => return None,
    })
}

fn event_tag(event: &tracing::Event<'_>) -> Option<tracing_forest::Tag> {
    let module = event
        .metadata()
        .target()
        .strip_prefix("ascom_device_access::")?;

    let mut builder = tracing_forest::Tag::builder()
        .prefix(module)
        .level(*event.metadata().level());

    if let Some(icon) = module_icon(module) {
        builder = builder.icon(icon);
    }

    Some(builder.build())
}

#[ctor::ctor]
fn prepare_test_env() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::filter::Targets::new()
                .with_target("ascom_device_access", tracing::Level::DEBUG),
        )
        .with(tracing_forest::ForestLayer::new(
            QuietSpans(tracing_forest::printer::TestCapturePrinter::new()),
            event_tag,
        ))
        .with(tracing_error::ErrorLayer::default())
        .init();

    color_eyre::config::HookBuilder::default()
        .add_frame_filter(Box::new(|frames| {
            frames.retain(|frame| {
                frame
                    .filename
                    .as_ref()
                    .is_some_and(|filename| filename.starts_with(env!("CARGO_MANIFEST_DIR")))
            });
        }))
        .install()
        .expect("Failed to install color_eyre");
}
