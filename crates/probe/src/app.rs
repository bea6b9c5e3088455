use gpick::{
    configure_swapchain, probe_swapchain_support, rank_devices, select_device,
    vulkan::{Device, Instance, PhysicalDevice, Surface, Swapchain},
    Extent2, Selection,
};
use miette::IntoDiagnostic;
use raw_window_handle::HasDisplayHandle;
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::WindowEvent,
    event_loop::ActiveEventLoop,
    window::{Window, WindowId},
};

use crate::config::Settings;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Keep the window open and renegotiate on resize.
    Run,

    /// Negotiate once, report and exit.
    Once,

    /// Report every candidate device and exit.
    List,
}

/// Objects created for the window.
/// Fields drop in declaration order, the reverse of creation.
struct State {
    swapchain: Option<Swapchain>,
    device: Device,
    selection: Selection<PhysicalDevice>,
    surface: Surface,
    instance: Instance,
    window: Window,
}

impl State {
    /// Negotiates and creates a swapchain for the current window size.
    /// The previous swapchain is retired.
    fn update_swapchain(
        &mut self,
        settings: &Settings,
        size: PhysicalSize<u32>,
    ) -> miette::Result<()> {
        if size.width == 0 || size.height == 0 {
            tracing::debug!("Window is minimized, keeping the swapchain");
            return Ok(());
        }

        // Surface may have changed since selection.
        let support =
            probe_swapchain_support(&self.instance, self.selection.device, self.surface.handle())?;

        let config = configure_swapchain(
            &support,
            &self.selection.queue_families,
            Extent2::new(size.width, size.height),
            &settings.preferences,
        )?;

        if let Some(swapchain) = &self.swapchain {
            if *swapchain.config() == config {
                return Ok(());
            }
        }

        self.device.wait_idle()?;
        let swapchain = self
            .device
            .create_swapchain(&self.surface, &config, self.swapchain.as_ref())?;
        self.swapchain = Some(swapchain);

        Ok(())
    }

    fn report(&self) {
        let properties = &self.selection.properties;
        println!("instance: api {}", self.instance.version());
        println!(
            "device: {} ({}, api {}, score {})",
            properties.name, properties.device_type, properties.api_version, self.selection.score
        );

        let graphics = self.device.graphics_queue();
        let present = self.device.present_queue();
        println!(
            "queues: graphics {}, present {}{}",
            graphics.family,
            present.family,
            if graphics.queue == present.queue { ", shared" } else { "" }
        );

        match &self.swapchain {
            Some(swapchain) => {
                let config = swapchain.config();
                println!(
                    "swapchain: {:?} {:?}, {}, {}, {} images ({} requested)",
                    config.format.format,
                    config.format.color_space,
                    config.present_mode,
                    swapchain.extent(),
                    swapchain.images().len(),
                    config.image_count
                );
            }
            None => println!("swapchain: none, window has zero size"),
        }
    }
}

pub struct App {
    settings: Settings,
    mode: Mode,
    started: bool,
    state: Option<State>,
    error: Option<miette::Report>,
}

impl App {
    pub fn new(settings: Settings, mode: Mode) -> Self {
        App {
            settings,
            mode,
            started: false,
            state: None,
            error: None,
        }
    }

    /// Returns the error that stopped the event loop, if any.
    pub fn finish(self) -> miette::Result<()> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn fail(&mut self, events: &ActiveEventLoop, err: miette::Report) {
        tracing::error!("{err:?}");
        self.state = None;
        self.error = Some(err);
        events.exit();
    }

    fn create_window(&self, events: &ActiveEventLoop) -> miette::Result<Window> {
        let size = self.settings.window_size;
        let attributes = Window::default_attributes()
            .with_title("gpick")
            .with_inner_size(LogicalSize::new(size.width, size.height))
            .with_visible(self.mode != Mode::List);

        events
            .create_window(attributes)
            .map_err(|err| miette::miette!("Failed to create window: {err}"))
    }

    fn list(&self, events: &ActiveEventLoop) -> miette::Result<()> {
        let window = self.create_window(events)?;
        let display = window.display_handle().into_diagnostic()?.as_raw();

        let instance = Instance::load(display, self.settings.validation)?;

        // SAFETY: Locals drop in reverse order, the surface goes before the window.
        let surface = unsafe { instance.create_surface(&window) }?;

        let candidates = rank_devices(&instance, surface.handle(), &self.settings.requirements)?;
        if candidates.is_empty() {
            println!("no devices");
        }

        for candidate in &candidates {
            let evaluation = &candidate.evaluation;
            let properties = &evaluation.properties;
            match &evaluation.rejection {
                None => println!(
                    "#{} {} ({}): score {}",
                    candidate.index, properties.name, properties.device_type, evaluation.score
                ),
                Some(rejection) => println!(
                    "#{} {} ({}): unsuitable, {}",
                    candidate.index, properties.name, properties.device_type, rejection
                ),
            }
        }

        Ok(())
    }

    fn init(&self, events: &ActiveEventLoop) -> miette::Result<State> {
        let window = self.create_window(events)?;
        let display = window.display_handle().into_diagnostic()?.as_raw();

        let instance = Instance::load(display, self.settings.validation)?;

        // SAFETY: The surface is dropped before the window, see `State`.
        let surface = unsafe { instance.create_surface(&window) }?;

        let selection = select_device(&instance, surface.handle(), &self.settings.requirements)?;
        let device = instance.create_device(&selection, &self.settings.requirements)?;

        let size = window.inner_size();
        let mut state = State {
            swapchain: None,
            device,
            selection,
            surface,
            instance,
            window,
        };
        state.update_swapchain(&self.settings, size)?;

        Ok(state)
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, events: &ActiveEventLoop) {
        // Resumed may be delivered more than once.
        if self.started {
            return;
        }
        self.started = true;

        match self.mode {
            Mode::List => {
                if let Err(err) = self.list(events) {
                    self.fail(events, err);
                    return;
                }
                events.exit();
            }
            Mode::Once | Mode::Run => match self.init(events) {
                Ok(state) => {
                    if self.mode == Mode::Once {
                        state.report();
                        events.exit();
                    }
                    self.state = Some(state);
                }
                Err(err) => self.fail(events, err),
            },
        }
    }

    fn window_event(&mut self, events: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        let Some(state) = &mut self.state else {
            return;
        };

        if state.window.id() != id {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                tracing::info!("Window closed");
                events.exit();
            }
            WindowEvent::Resized(size) => {
                if let Err(err) = state.update_swapchain(&self.settings, size) {
                    self.fail(events, err);
                }
            }
            _ => {}
        }
    }

    fn exiting(&mut self, _events: &ActiveEventLoop) {
        // Tear down while the event loop is still alive.
        self.state = None;
    }
}
