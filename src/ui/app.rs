use eframe::egui;
use reqwest::Url;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use crate::config::{config_path, load_config, ShellConfig};
use crate::engine::compose::{viewport_height, BottomBar};
use crate::engine::persist::FileStore;
use crate::engine::shell::Shell;
use crate::error::ShellError;
use crate::ui::assets::{decode_icon, manifest_title, AssetStatus};
use crate::ui::center_panel::{
    draw_action_bar, draw_content, draw_input_bar, InputAction, LifeJobAction,
};
use crate::ui::fatal::FatalApp;
use crate::ui::tab_bar::draw_tab_bar;
use crate::worker::cache::CacheStorage;
use crate::worker::cache_worker::{CacheWorker, WorkerHandle};
use crate::worker::fetch::{AssetRequest, AssetResponse, HttpFetcher};
use crate::worker::policy::{OfflineCache, CACHE_VERSION};
use crate::worker::protocol::{WorkerCommand, WorkerEvent};

const MANIFEST: &str = "manifest.json";
const WINDOW_ICON: &str = "icon-192.png";

/* =========================
   Boot
   ========================= */

/// Build the shell, or a fatal panel explaining why it could not start.
pub fn boot(ctx: &egui::Context) -> Box<dyn eframe::App> {
    let started = panic::catch_unwind(AssertUnwindSafe(|| {
        let config = load_config(&config_path())?;
        ShellApp::start(config, ctx.clone())
    }));

    let err = match started {
        Ok(Ok(app)) => return Box::new(app),
        Ok(Err(e)) => e,
        Err(payload) => {
            let msg = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            ShellError::Panic(msg)
        }
    };

    log::error!("Shell failed to start: {err}");
    Box::new(FatalApp::new(err.to_string()))
}

/* =========================
   App
   ========================= */

pub struct ShellApp {
    shell: Shell<FileStore>,
    config: ShellConfig,
    draft: String,

    worker: WorkerHandle,
    scope: Url,
    asset_status: AssetStatus,
}

impl ShellApp {
    pub fn start(config: ShellConfig, ctx: egui::Context) -> Result<Self, ShellError> {
        let store = FileStore::new(config.state_path());
        let (shell, _) = Shell::open(store, config.limits());

        let scope = config.asset_scope()?;
        let fetcher = HttpFetcher::new(config.fetch_timeout())?;
        let cache = OfflineCache::new(
            CacheStorage::new(config.cache_root()),
            Box::new(fetcher),
            scope.clone(),
            CACHE_VERSION,
        );
        // Startup fetches land while the window is idle.
        let worker = CacheWorker::spawn(cache, move || ctx.request_repaint())?;

        worker.send(WorkerCommand::Install);
        worker.send(WorkerCommand::Activate);
        worker.send(WorkerCommand::Fetch(AssetRequest::navigate(scope.clone())));
        for path in [MANIFEST, WINDOW_ICON] {
            if let Ok(url) = scope.join(path) {
                worker.send(WorkerCommand::Fetch(AssetRequest::get(url)));
            }
        }

        Ok(Self {
            shell,
            config,
            draft: String::new(),
            worker,
            scope,
            asset_status: AssetStatus::Unknown,
        })
    }

    fn drain_worker(&mut self, ctx: &egui::Context) {
        while let Ok(event) = self.worker.event_rx.try_recv() {
            match event {
                WorkerEvent::Installed(report) => {
                    log::debug!("Precached {} assets", report.cached.len());
                }
                WorkerEvent::Activated { deleted } => {
                    log::debug!("Swept {} stale caches", deleted.len());
                }
                WorkerEvent::Fetched(resp) => self.apply_asset(ctx, resp),
                WorkerEvent::Failed { what, reason } => {
                    log::warn!("{what}: {reason}");
                }
            }
        }
    }

    fn apply_asset(&mut self, ctx: &egui::Context, resp: AssetResponse) {
        if resp.url == self.scope.as_str() {
            self.asset_status = AssetStatus::from_source(resp.source);
            return;
        }
        if !resp.is_ok() {
            log::debug!("No usable copy of {} ({})", resp.url, resp.status);
            return;
        }

        if resp.url.ends_with(MANIFEST) {
            match manifest_title(&resp.body) {
                Ok(title) => ctx.send_viewport_cmd(egui::ViewportCommand::Title(title)),
                Err(e) => log::warn!("Ignoring manifest: {e}"),
            }
        } else if resp.url.ends_with(WINDOW_ICON) {
            match decode_icon(&resp.body) {
                Ok(icon) => ctx.send_viewport_cmd(egui::ViewportCommand::Icon(Some(Arc::new(icon)))),
                Err(e) => log::warn!("Ignoring window icon: {e}"),
            }
        }
    }
}

/* =========================
   egui App
   ========================= */

impl eframe::App for ShellApp {
    fn update(&mut self, ctx: &egui::Context, _: &mut eframe::Frame) {
        ctx.set_pixels_per_point(self.config.ui_scale);

        self.drain_worker(ctx);

        let view = self.shell.view();

        /* TOP */
        let tabs = draw_tab_bar(ctx, &view.layout, view.active, self.asset_status);
        if let Some(tab) = tabs.clicked {
            self.shell.select_tab(tab.id());
            ctx.request_repaint();
        }

        /* BOTTOM */
        let bottom_height = match view.bottom_bar {
            BottomBar::Input => {
                let bar = draw_input_bar(ctx, &mut self.draft, self.shell.state().world.persona);
                match bar.action {
                    Some(InputAction::Send) => {
                        self.shell.submit(&mut self.draft);
                    }
                    Some(InputAction::Persona(mode)) => self.shell.set_persona(mode),
                    None => {}
                }
                Some(bar.height)
            }
            BottomBar::Actions => {
                let bar = draw_action_bar(ctx);
                match bar.action {
                    Some(LifeJobAction::Cancel) => self.shell.cancel_life_job(),
                    Some(LifeJobAction::Execute) => self.shell.execute_life_job(),
                    None => {}
                }
                Some(bar.height)
            }
            BottomBar::Hidden => None,
        };

        /* CENTER */
        let container = ctx
            .input(|i| i.viewport().inner_rect)
            .map(|r| r.height())
            .unwrap_or(f32::INFINITY);
        let height = viewport_height(container, tabs.height, bottom_height);

        if let Some(index) = draw_content(ctx, &view, &self.config, height) {
            self.shell.select_recipe(index);
        }
    }
}
