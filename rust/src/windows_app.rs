use anyhow::{Context, Result};
use olfactory_pyramid_editor::config_store::ConfigStore;
use olfactory_pyramid_editor::path_utils::{get_base_dir, resolve_config_path};
use olfactory_pyramid_editor::server::{AppServer, AppState};
use raw_window_handle::{HasWindowHandle, RawWindowHandle};
use std::env;
use std::os::windows::ffi::OsStrExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use windows_sys::Win32::System::LibraryLoader::GetModuleHandleW;
use windows_sys::Win32::UI::WindowsAndMessaging::{
    LoadImageW, SendMessageW, ICON_BIG, ICON_SMALL, IMAGE_ICON, LR_DEFAULTSIZE, LR_LOADFROMFILE,
    LR_SHARED, WM_SETICON,
};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::platform::windows::EventLoopBuilderExtWindows;
use winit::window::{Window, WindowId};
use wry::{WebView, WebViewBuilder};

pub fn run() -> Result<()> {
    crate::init_tracing();

    let args = crate::parse_args();
    let base_dir = get_base_dir();
    let config_path = resolve_config_path(args.config, &base_dir);

    let config = ConfigStore::load(config_path.clone())
        .with_context(|| format!("erro de configuração: {}", config_path.display()))?;
    let preferred_port = config.server_port();

    let state = Arc::new(AppState::new(config));
    let server = AppServer::start(state, preferred_port)
        .context("erro ao iniciar o servidor local do editor")?;

    let url = format!("http://127.0.0.1:{}/", server.port());
    let event_loop = build_event_loop().context("failed to create event loop")?;

    let mut app = DesktopApp::new(url, server);
    event_loop
        .run_app(&mut app)
        .context("event loop terminated unexpectedly")?;

    Ok(())
}

struct DesktopApp {
    url: String,
    window: Option<Window>,
    webview: Option<WebView>,
    server: Option<AppServer>,
    last_logical_size: LogicalSize<f64>,
}

impl DesktopApp {
    fn new(url: String, server: AppServer) -> Self {
        Self {
            url,
            window: None,
            webview: None,
            server: Some(server),
            last_logical_size: LogicalSize::new(1060.0, 780.0),
        }
    }

    fn init_window(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        if self.window.is_some() {
            return Ok(());
        }

        let attrs = Window::default_attributes()
            .with_title("Editor de Pirâmide Olfativa")
            .with_inner_size(self.last_logical_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create main window")?;
        apply_window_icon(&window);

        let webview = WebViewBuilder::new()
            .with_url(&self.url)
            .build(&window)
            .context("failed to build webview")?;

        self.last_logical_size = window.inner_size().to_logical(window.scale_factor());
        self.webview = Some(webview);
        self.window = Some(window);
        Ok(())
    }

    fn shutdown_server(&mut self) {
        if let Some(mut server) = self.server.take() {
            server.stop();
        }
    }
}

impl ApplicationHandler for DesktopApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if let Err(err) = self.init_window(event_loop) {
            tracing::error!(%err, "falha ao abrir a janela do editor");
            self.shutdown_server();
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                self.shutdown_server();
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(scale_factor) = self.window.as_ref().map(Window::scale_factor) {
                    self.last_logical_size = new_size.to_logical(scale_factor);
                }
            }
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.shutdown_server();
    }
}

fn build_event_loop() -> Result<EventLoop<()>> {
    let mut builder = EventLoop::builder();
    // O modo de DPI vem do manifesto do aplicativo; não duplicar aqui.
    builder.with_dpi_aware(false);
    builder.build().map_err(Into::into)
}

fn apply_window_icon(window: &Window) {
    let Some(hwnd) = hwnd_from_window(window) else {
        return;
    };

    let icon_handle = load_icon_handle_from_resource()
        .or_else(|| resolve_icon_path().and_then(|path| load_icon_handle_from_file(&path)));
    let Some(icon_handle) = icon_handle else {
        return;
    };

    unsafe {
        SendMessageW(hwnd, WM_SETICON, ICON_BIG as usize, icon_handle);
        SendMessageW(hwnd, WM_SETICON, ICON_SMALL as usize, icon_handle);
    }
}

fn hwnd_from_window(window: &Window) -> Option<*mut core::ffi::c_void> {
    let handle = window.window_handle().ok()?;
    match handle.as_raw() {
        RawWindowHandle::Win32(win32) => Some(win32.hwnd.get() as *mut core::ffi::c_void),
        _ => None,
    }
}

fn resolve_icon_path() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(exe_path) = env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.push(exe_dir.join("app.ico"));
            candidates.push(exe_dir.join("assets").join("app.ico"));
        }
    }

    candidates.push(PathBuf::from("assets").join("app.ico"));
    candidates.push(PathBuf::from("app.ico"));

    candidates.into_iter().find(|path| path.is_file())
}

fn load_icon_handle_from_resource() -> Option<isize> {
    let module = unsafe { GetModuleHandleW(core::ptr::null()) };
    if module.is_null() {
        return None;
    }

    // winres grava o ícone principal como primeiro recurso de ícone.
    let icon_resource_id = 1usize as *const u16;
    let handle = unsafe {
        LoadImageW(
            module,
            icon_resource_id,
            IMAGE_ICON,
            0,
            0,
            LR_DEFAULTSIZE | LR_SHARED,
        )
    };

    if handle.is_null() {
        None
    } else {
        Some(handle as isize)
    }
}

fn load_icon_handle_from_file(path: &Path) -> Option<isize> {
    let mut wide = path.as_os_str().encode_wide().collect::<Vec<u16>>();
    wide.push(0);

    let handle = unsafe {
        LoadImageW(
            core::ptr::null_mut(),
            wide.as_ptr(),
            IMAGE_ICON,
            0,
            0,
            LR_LOADFROMFILE | LR_DEFAULTSIZE | LR_SHARED,
        )
    };

    if handle.is_null() {
        None
    } else {
        Some(handle as isize)
    }
}
