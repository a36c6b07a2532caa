/// Process-wide monotonically increasing non-zero counter, one per call site.
macro_rules! auto_increment {
    () => {{
        use std::num::NonZeroU32;
        use std::sync::atomic::{AtomicU32, Ordering};

        static COUNTER: AtomicU32 = AtomicU32::new(0);
        NonZeroU32::MIN.saturating_add(COUNTER.fetch_add(1, Ordering::Relaxed))
    }};
}

pub(crate) use auto_increment;
