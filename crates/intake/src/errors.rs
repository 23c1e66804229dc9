use std::panic::PanicHookInfo;
use std::sync::OnceLock;

use color_eyre::config::PanicHook;
use color_eyre::Result;
use tracing::error;

static INIT: OnceLock<()> = OnceLock::new();

/// Install the eyre report hook and the panic handler. Safe to call twice.
pub fn init() -> Result<()> {
    if INIT.get().is_some() {
        return Ok(());
    }

    let (panic_hook, eyre_hook) = color_eyre::config::HookBuilder::default()
        .panic_section(format!(
            "intake {} crashed; the session was not submitted. \
             Please attach the log file when reporting this.",
            env!("CARGO_PKG_VERSION")
        ))
        .capture_span_trace_by_default(false)
        .display_location_section(false)
        .display_env_section(false)
        .try_into_hooks()?;
    eyre_hook.install()?;

    std::panic::set_hook(Box::new(move |info| {
        report_panic(&panic_hook, info);
        std::process::exit(libc::EXIT_FAILURE);
    }));

    let _ = INIT.set(());
    Ok(())
}

fn report_panic(hook: &PanicHook, info: &PanicHookInfo<'_>) {
    let report = format!("{}", hook.panic_report(info));
    // the file layer has no ANSI support
    error!("panic: {}", strip_ansi_escapes::strip_str(&report));

    #[cfg(not(debug_assertions))]
    {
        use human_panic::{handle_dump, metadata, print_msg};
        let metadata = metadata!();
        let dump = handle_dump(&metadata, info);
        let _ = print_msg(dump, &metadata);
        eprintln!("{report}");
    }

    #[cfg(debug_assertions)]
    {
        better_panic::Settings::auto()
            .most_recent_first(false)
            .lineno_suffix(true)
            .verbosity(better_panic::Verbosity::Full)
            .create_panic_handler()(info);
    }
}
