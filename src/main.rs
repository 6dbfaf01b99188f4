// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Naiad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Naiad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Naiad CLI entrypoint.
//!
//! By default this runs the interactive terminal workspace and serves the
//! web surface at `http://127.0.0.1:<port>/`.
//!
//! Use `--serve` to run the web surface alone (headless deployments).

use std::error::Error;
use std::sync::Arc;

use tokio::sync::{watch, Mutex};

use naiad::session::{IdentityProvider, LocalIdentity, SessionWatcher};
use naiad::store::{NoteFolder, WriteDurability};
use naiad::ui::WorkspaceState;
use naiad::web::Gateway;

const DEFAULT_HTTP_PORT: u16 = 27460;
const DEMO_EMAIL: &str = "demo@naiad.dev";
const DEMO_PASSWORD: &str = "demo";

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [<store-dir>] [--durable-writes] [--http-port <port>]\n  {program} [--store <dir>] [--durable-writes] [--http-port <port>]\n  {program} --demo [--http-port <port>]\n  {program} [<store-dir>] [--durable-writes] --serve\n  {program} --demo --serve\n\nWorkspace mode (default) runs the terminal workspace and serves the web surface at `http://127.0.0.1:<port>/`.\n--http-port selects the port (0 = ephemeral; default {DEFAULT_HTTP_PORT}, or NAIAD_HTTP_PORT).\n\nIf store-dir/--store is omitted, the current working directory is used.\n--demo seeds a demo account ({DEMO_EMAIL} / {DEMO_PASSWORD}) with sample notes in a temp store and cannot be combined with store-dir/--store.\n\n--serve runs the web surface without the terminal workspace.\n--durable-writes opts into slower, best-effort durable persistence (fsync/sync where supported)."
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    serve: bool,
    demo: bool,
    store_dir: Option<String>,
    http_port: Option<u16>,
    durable_writes: bool,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--serve" => {
                if options.serve {
                    return Err(());
                }
                options.serve = true;
            }
            "--demo" => {
                if options.demo {
                    return Err(());
                }
                options.demo = true;
            }
            "--store" => {
                if options.store_dir.is_some() {
                    return Err(());
                }
                let dir = args.next().ok_or(())?;
                options.store_dir = Some(dir);
            }
            "--http-port" => {
                if options.http_port.is_some() {
                    return Err(());
                }
                let raw = args.next().ok_or(())?;
                let port: u16 = raw.parse().map_err(|_| ())?;
                options.http_port = Some(port);
            }
            "--durable-writes" => {
                if options.durable_writes {
                    return Err(());
                }
                options.durable_writes = true;
            }
            _ if arg.starts_with('-') => return Err(()),
            _ => {
                if options.store_dir.is_some() {
                    return Err(());
                }
                options.store_dir = Some(arg);
            }
        }
    }

    if options.demo && options.store_dir.is_some() {
        return Err(());
    }

    Ok(options)
}

fn http_port_from_env() -> Option<u16> {
    std::env::var("NAIAD_HTTP_PORT").ok().and_then(|raw| raw.trim().parse().ok())
}

fn main() {
    env_logger::init();

    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "naiad".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        let identity = Arc::new(LocalIdentity::new());

        let folder = if options.demo {
            let now_millis = std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or(0);
            let demo_dir = std::env::temp_dir()
                .join(format!("naiad-demo-store-{}-{now_millis}", std::process::id()));
            NoteFolder::new(demo_dir)
        } else {
            let dir = options.store_dir.clone().unwrap_or_else(|| ".".to_owned());
            NoteFolder::new(dir)
        };
        let folder = if options.durable_writes {
            folder.with_durability(WriteDurability::Durable)
        } else {
            folder
        };

        if options.demo {
            let signed_in = identity.sign_up(DEMO_EMAIL, DEMO_PASSWORD)?;
            for note in naiad::tui::demo_notes(signed_in.principal().user_id()) {
                folder.insert_note(&note)?;
            }
            log::info!("demo account: {DEMO_EMAIL} / {DEMO_PASSWORD}");
        }

        let workspace = Arc::new(Mutex::new(WorkspaceState::default()));
        let gateway = Arc::new(Gateway::new(
            identity.clone() as Arc<dyn IdentityProvider>,
            folder.clone(),
            workspace.clone(),
        ));

        let http_port = options
            .http_port
            .or_else(http_port_from_env)
            .unwrap_or(DEFAULT_HTTP_PORT);

        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;

        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::bind(("127.0.0.1", http_port)).await?;
            let local_addr = listener.local_addr()?;
            log::info!("web surface listening on http://{local_addr}/");

            let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
            let router = naiad::web::router(gateway);
            let server_handle = tokio::spawn(async move {
                let serve = axum::serve(listener, router).with_graceful_shutdown(async move {
                    let _ = shutdown_rx.changed().await;
                });
                if let Err(err) = serve.await {
                    eprintln!("naiad: web server error: {err}");
                }
            });

            if options.serve {
                // Headless mode: the server is the whole process.
                server_handle.await?;
                return Ok::<(), Box<dyn Error>>(());
            }

            let watcher = SessionWatcher::new(identity.clone() as Arc<dyn IdentityProvider>);
            let tui_workspace = workspace.clone();
            let tui_join = tokio::task::spawn_blocking(move || {
                naiad::tui::run_with_workspace(watcher, folder, Some(tui_workspace))
                    .map_err(|err| err.to_string())
            })
            .await;

            let _ = shutdown_tx.send(true);
            let _ = server_handle.await;

            let tui_result = tui_join.map_err(|err| -> Box<dyn Error> { Box::new(err) })?;
            tui_result.map_err(|err| {
                Box::new(std::io::Error::other(err)) as Box<dyn Error>
            })?;
            Ok::<(), Box<dyn Error>>(())
        })?;

        Ok(())
    })();

    if let Err(err) = result {
        eprintln!("naiad: {err}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_options, CliOptions};

    #[test]
    fn parses_empty_args() {
        let options = parse_options(std::iter::empty()).expect("parse options");
        assert_eq!(options, CliOptions::default());
    }

    #[test]
    fn parses_demo_flag() {
        let options = parse_options(["--demo".to_owned()].into_iter()).expect("parse options");
        assert!(options.demo);
        assert!(!options.serve);
        assert!(options.store_dir.is_none());
        assert_eq!(options.http_port, None);
    }

    #[test]
    fn parses_serve_flag() {
        let options = parse_options(["--serve".to_owned()].into_iter()).expect("parse options");
        assert!(options.serve);
        assert!(!options.demo);
        assert!(options.store_dir.is_none());
    }

    #[test]
    fn parses_store_dir() {
        let options = parse_options(["--store".to_owned(), "some/dir".to_owned()].into_iter())
            .expect("parse options");
        assert_eq!(options.store_dir.as_deref(), Some("some/dir"));
        assert!(!options.serve);
        assert!(!options.demo);
    }

    #[test]
    fn parses_http_port() {
        let options = parse_options(["--http-port".to_owned(), "1234".to_owned()].into_iter())
            .expect("parse options");
        assert_eq!(options.http_port, Some(1234));
    }

    #[test]
    fn parses_demo_and_serve_in_any_order() {
        let options = parse_options(["--demo".to_owned(), "--serve".to_owned()].into_iter())
            .expect("parse options");
        assert!(options.demo);
        assert!(options.serve);

        let options = parse_options(["--serve".to_owned(), "--demo".to_owned()].into_iter())
            .expect("parse options");
        assert!(options.demo);
        assert!(options.serve);
    }

    #[test]
    fn rejects_demo_with_store_dir() {
        parse_options(["--demo".to_owned(), "--store".to_owned(), ".".to_owned()].into_iter())
            .unwrap_err();
    }

    #[test]
    fn parses_positional_store_dir() {
        let options = parse_options(["some/dir".to_owned()].into_iter()).expect("parse options");
        assert_eq!(options.store_dir.as_deref(), Some("some/dir"));
    }

    #[test]
    fn rejects_unknown_args() {
        parse_options(["--nope".to_owned()].into_iter()).unwrap_err();
    }

    #[test]
    fn rejects_duplicate_flags() {
        parse_options(["--demo".to_owned(), "--demo".to_owned()].into_iter()).unwrap_err();

        parse_options(["--serve".to_owned(), "--serve".to_owned()].into_iter()).unwrap_err();

        parse_options(
            ["--store".to_owned(), ".".to_owned(), "--store".to_owned(), "other".to_owned()]
                .into_iter(),
        )
        .unwrap_err();
    }

    #[test]
    fn rejects_multiple_positional_store_dirs() {
        parse_options(["one".to_owned(), "two".to_owned()].into_iter()).unwrap_err();
    }

    #[test]
    fn rejects_missing_store_value() {
        parse_options(["--store".to_owned()].into_iter()).unwrap_err();
    }
}
