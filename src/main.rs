//! FielderPro entry point
//!
//! On wasm32 this boots the WebGPU editor in the page canvas. Natively it prints
//! a coverage report for the default roster or a shared layout.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    use glam::{Vec2, Vec3};
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, HtmlElement, HtmlInputElement, KeyboardEvent, PointerEvent, WheelEvent};

    use fielder_pro::input::{Interaction, NameEdit, OrbitCamera, drag_ground_point, pick_fielder, pixel_to_ndc};
    use fielder_pro::renderer::{FieldRenderer, scene};
    use fielder_pro::{FieldConstants, FieldSession, Settings};

    /// Label sits this far above a fielder's feet
    const LABEL_HEIGHT: f32 = 6.5;

    // Clipboard access; rejects when the API is missing or permission is denied
    #[wasm_bindgen(inline_js = "
        export function copy_to_clipboard(text) {
            if (!navigator.clipboard) {
                return Promise.reject(new Error('Clipboard API unavailable'));
            }
            return navigator.clipboard.writeText(text);
        }
    ")]
    extern "C" {
        fn copy_to_clipboard(text: &str) -> js_sys::Promise;
    }

    /// Editor instance holding all state
    struct App {
        session: FieldSession,
        settings: Settings,
        camera: OrbitCamera,
        interaction: Interaction,
        name_edit: NameEdit,
        renderer: Option<FieldRenderer>,
        canvas: HtmlCanvasElement,
        /// Last pointer position while orbiting/panning (CSS pixels)
        last_pointer: Option<Vec2>,
        panning: bool,
        labels: HashMap<String, HtmlElement>,
        /// Analysis revision the summary text was built from
        summary_revision: u64,
    }

    impl App {
        fn viewport(&self) -> Vec2 {
            Vec2::new(
                self.canvas.client_width().max(1) as f32,
                self.canvas.client_height().max(1) as f32,
            )
        }

        fn pointer_ray(&self, event: &PointerEvent) -> fielder_pro::input::Ray {
            let viewport = self.viewport();
            let pixel = Vec2::new(event.offset_x() as f32, event.offset_y() as f32);
            self.camera
                .screen_ray(pixel_to_ndc(pixel, viewport), viewport.x / viewport.y)
        }

        fn pointer_down(&mut self, event: &PointerEvent) {
            let ray = self.pointer_ray(event);
            let picked = pick_fielder(&ray, self.session.players()).map(|f| f.id.clone());

            if let Some(id) = picked {
                if self.interaction.begin_drag(&id, event.pointer_id()) {
                    let _ = self.canvas.set_pointer_capture(event.pointer_id());
                    self.interaction.sync_camera(&mut self.camera);
                    log::debug!("Dragging '{}'", id);
                }
                return;
            }

            self.last_pointer = Some(Vec2::new(event.offset_x() as f32, event.offset_y() as f32));
            self.panning = event.button() == 2 || event.shift_key();
        }

        fn pointer_move(&mut self, event: &PointerEvent) {
            if let Some(id) = self.interaction.drag_target(event.pointer_id()).map(str::to_string) {
                let ray = self.pointer_ray(event);
                let target = self
                    .session
                    .fielder(&id)
                    .and_then(|f| drag_ground_point(&ray, f));
                if let Some(point) = target {
                    self.session.move_fielder(&id, point);
                }
                return;
            }

            let Some(last) = self.last_pointer else {
                return;
            };
            let pixel = Vec2::new(event.offset_x() as f32, event.offset_y() as f32);
            let delta = pixel - last;
            self.last_pointer = Some(pixel);

            if self.panning {
                self.camera.pan(delta.x, delta.y);
            } else {
                let s = self.settings.orbit_sensitivity;
                self.camera.orbit(delta.x * s, delta.y * s);
            }
        }

        fn pointer_up(&mut self, event: &PointerEvent) {
            if let Some(id) = self.interaction.end_drag(event.pointer_id()) {
                let _ = self.canvas.release_pointer_capture(event.pointer_id());
                self.interaction.sync_camera(&mut self.camera);
                log::debug!("Released '{}'", id);
            }
            self.last_pointer = None;
            self.panning = false;
        }

        /// Render the current frame
        fn render(&mut self) {
            let meshes = scene(
                self.session.players(),
                self.session.constants(),
                self.session.analysis(),
                &self.settings,
                self.camera.eye(),
            );
            if let Some(ref mut renderer) = self.renderer {
                let view_proj = self.camera.view_proj(renderer.aspect());
                match renderer.render(&meshes, view_proj) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        renderer.resize(renderer.size.0, renderer.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Keep one floating label per fielder, positioned over its head
        fn sync_labels(&mut self, document: &web_sys::Document) {
            let container = document.get_element_by_id("labels");
            let viewport = self.viewport();
            let editing = self.name_edit.editing_id().map(str::to_string);

            for fielder in self.session.players() {
                let label = match self.labels.get(&fielder.id) {
                    Some(label) => label.clone(),
                    None => {
                        let Some(label) = create_label(document, &fielder.id) else {
                            continue;
                        };
                        if let Some(ref container) = container {
                            let _ = container.append_child(&label);
                        }
                        self.labels.insert(fielder.id.clone(), label.clone());
                        label
                    }
                };

                if label.text_content().as_deref() != Some(fielder.name.as_str()) {
                    label.set_text_content(Some(&fielder.name));
                }

                let visible = self.settings.show_labels && editing.as_deref() != Some(fielder.id.as_str());
                let anchor = fielder.position + Vec3::new(0.0, LABEL_HEIGHT, 0.0);
                let style = label.style();
                match self.camera.project(anchor, viewport) {
                    Some(px) if visible => {
                        let _ = style.set_property("display", "block");
                        let _ = style.set_property("left", &format!("{:.0}px", px.x));
                        let _ = style.set_property("top", &format!("{:.0}px", px.y));
                    }
                    _ => {
                        let _ = style.set_property("display", "none");
                    }
                }
            }
        }

        /// Gap summary text, rebuilt only when the analysis changes
        fn update_summary(&mut self, document: &web_sys::Document) {
            let revision = self.session.analysis_revision();
            if revision == self.summary_revision {
                return;
            }
            self.summary_revision = revision;

            let analysis = self.session.analysis();
            let text = if !self.session.show_coverage() {
                "Coverage off".to_string()
            } else if let Some(widest) = analysis.widest_gap() {
                format!(
                    "{} gaps, {:.0}° uncovered (widest {:.0}° wide around {:.0}°)",
                    analysis.gaps.len(),
                    analysis.uncovered_degrees(),
                    widest.span_deg(),
                    widest.mid_deg()
                )
            } else {
                "No gaps".to_string()
            };
            if let Some(el) = document.get_element_by_id("gap-summary") {
                el.set_text_content(Some(&text));
            }
        }
    }

    fn create_label(document: &web_sys::Document, id: &str) -> Option<HtmlElement> {
        let label: HtmlElement = document.create_element("div").ok()?.dyn_into().ok()?;
        label.set_class_name("fielder-label");
        let _ = label.set_attribute("data-fielder", id);
        Some(label)
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("FielderPro starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        // Set canvas size
        let (width, height) = backing_size(&window, &canvas);
        canvas.set_width(width);
        canvas.set_height(height);

        let settings = Settings::load();
        let search = window.location().search().unwrap_or_default();
        let mut session = FieldSession::from_query(&search, FieldConstants::default());
        session.set_show_coverage(settings.show_coverage);

        log::info!(
            "Session ready: {} players, {} gaps",
            session.players().len(),
            session.analysis().gaps.len()
        );

        let app = Rc::new(RefCell::new(App {
            session,
            settings,
            camera: OrbitCamera::default(),
            interaction: Interaction::default(),
            name_edit: NameEdit::default(),
            renderer: None,
            canvas: canvas.clone(),
            last_pointer: None,
            panning: false,
            labels: HashMap::new(),
            summary_revision: 0,
        }));

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        match instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
        {
            Ok(adapter) => {
                log::info!("Using adapter: {:?}", adapter.get_info().name);
                match FieldRenderer::new(surface, &adapter, width, height).await {
                    Ok(renderer) => app.borrow_mut().renderer = Some(renderer),
                    Err(e) => log::error!("Failed to create device: {}", e),
                }
            }
            Err(e) => log::error!("No WebGPU adapter: {}", e),
        }

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        setup_pointer_handlers(&canvas, app.clone());
        setup_resize(app.clone());
        setup_name_editor(&document, app.clone());
        setup_toolbar(&document, app.clone());

        request_animation_frame(app);

        log::info!("FielderPro running!");
    }

    fn backing_size(window: &web_sys::Window, canvas: &HtmlCanvasElement) -> (u32, u32) {
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        (width.max(1), height.max(1))
    }

    fn setup_pointer_handlers(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) {
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                app.borrow_mut().pointer_down(&event);
            });
            let _ = canvas
                .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                app.borrow_mut().pointer_move(&event);
            });
            let _ = canvas
                .add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        for name in ["pointerup", "pointercancel"] {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                app.borrow_mut().pointer_up(&event);
            });
            let _ = canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Wheel zoom
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: WheelEvent| {
                event.prevent_default();
                let mut a = app.borrow_mut();
                let factor = event.delta_y() as f32 * a.settings.zoom_sensitivity;
                a.camera.zoom(factor);
            });
            let _ = canvas
                .add_event_listener_with_callback("wheel", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Right-drag pans, so keep the context menu out of the way
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                event.prevent_default();
            });
            let _ = canvas
                .add_event_listener_with_callback("contextmenu", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Some(window) = web_sys::window() else {
                return;
            };
            let mut a = app.borrow_mut();
            let (width, height) = backing_size(&window, &a.canvas);
            a.canvas.set_width(width);
            a.canvas.set_height(height);
            if let Some(ref mut renderer) = a.renderer {
                renderer.resize(width, height);
            }
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Label double-click opens a shared text input over the label
    fn setup_name_editor(document: &web_sys::Document, app: Rc<RefCell<App>>) {
        let Some(editor) = document
            .get_element_by_id("name-editor")
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        else {
            log::warn!("No #name-editor input, renaming disabled");
            return;
        };

        // Clicks on any label bubble up to the container
        if let Some(container) = document.get_element_by_id("labels") {
            let app = app.clone();
            let editor = editor.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::MouseEvent| {
                let Some(label) = event
                    .target()
                    .and_then(|t| t.dyn_into::<HtmlElement>().ok())
                else {
                    return;
                };
                let Some(id) = label.get_attribute("data-fielder") else {
                    return;
                };

                let started = {
                    let mut a = app.borrow_mut();
                    let Some(name) = a.session.fielder(&id).map(|f| f.name.clone()) else {
                        return;
                    };
                    let threshold = a.settings.double_click_ms;
                    a.name_edit.click(&id, &name, js_sys::Date::now(), threshold)
                        .then_some(name)
                };

                if let Some(name) = started {
                    editor.set_value(&name);
                    let style = editor.style();
                    let _ = style.set_property("display", "block");
                    let _ = style.set_property("left", &label.style().get_property_value("left").unwrap_or_default());
                    let _ = style.set_property("top", &label.style().get_property_value("top").unwrap_or_default());
                    let _ = editor.focus();
                    editor.select();
                }
            });
            let _ = container.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let app = app.clone();
            let editor_clone = editor.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                app.borrow_mut().name_edit.set_draft(&editor_clone.value());
            });
            let _ = editor.add_event_listener_with_callback("input", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Enter commits, Escape cancels
        {
            let app = app.clone();
            let editor_clone = editor.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                match event.key().as_str() {
                    "Enter" => {
                        commit_name(&app);
                    }
                    "Escape" => {
                        if let Some(original) = app.borrow_mut().name_edit.cancel() {
                            log::debug!("Rename cancelled, keeping '{}'", original);
                        }
                    }
                    _ => return,
                }
                event.prevent_default();
                hide_editor(&editor_clone);
            });
            let _ = editor.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Blur commits too (no-op if Enter/Escape already ended the edit)
        {
            let app = app.clone();
            let editor_clone = editor.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                commit_name(&app);
                hide_editor(&editor_clone);
            });
            let _ = editor.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn commit_name(app: &Rc<RefCell<App>>) {
        let Ok(mut a) = app.try_borrow_mut() else {
            return;
        };
        if let Some((id, name)) = a.name_edit.commit() {
            a.session.rename_fielder(&id, &name);
        }
    }

    fn hide_editor(editor: &HtmlInputElement) {
        let _ = editor.style().set_property("display", "none");
    }

    fn setup_toolbar(document: &web_sys::Document, app: Rc<RefCell<App>>) {
        // Share button
        if let Some(btn) = document.get_element_by_id("share-btn") {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let Some(window) = web_sys::window() else {
                    return;
                };
                let location = window.location();
                let origin = location.origin().unwrap_or_default();
                let path = location.pathname().unwrap_or_else(|_| "/".to_string());

                let url = match app.borrow().session.share_url(&origin, &path) {
                    Ok(url) => url,
                    Err(e) => {
                        log::error!("Failed to build share link: {}", e);
                        return;
                    }
                };

                wasm_bindgen_futures::spawn_local(async move {
                    match wasm_bindgen_futures::JsFuture::from(copy_to_clipboard(&url)).await {
                        Ok(_) => log::info!("Share link copied to clipboard"),
                        Err(e) => {
                            log::warn!("Clipboard write failed: {:?}", e);
                            if let Some(window) = web_sys::window() {
                                let _ = window.prompt_with_message_and_default("Copy this link:", &url);
                            }
                        }
                    }
                });
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Coverage toggle
        if let Some(toggle) = document
            .get_element_by_id("coverage-toggle")
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        {
            toggle.set_checked(app.borrow().settings.show_coverage);
            let app = app.clone();
            let toggle_clone = toggle.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let checked = toggle_clone.checked();
                let mut a = app.borrow_mut();
                a.session.set_show_coverage(checked);
                a.settings.show_coverage = checked;
                a.settings.save();
            });
            let _ = toggle.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Layout title
        if let Some(title) = document
            .get_element_by_id("field-title")
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        {
            title.set_value(app.borrow().session.title().unwrap_or_default());
            let app = app.clone();
            let title_clone = title.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                app.borrow_mut().session.set_title(Some(title_clone.value()));
            });
            let _ = title.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |_time: f64| {
            frame(app);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame(app: Rc<RefCell<App>>) {
        if let Some(document) = web_sys::window().and_then(|w| w.document()) {
            let mut a = app.borrow_mut();
            a.render();
            a.sync_labels(&document);
            a.update_summary(&document);
        }

        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_app::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use fielder_pro::{FieldConstants, FieldSession, share};

    env_logger::init();
    log::info!("FielderPro (native) starting...");
    log::info!("The editor needs a browser - run with `trunk serve`; printing a coverage report");

    // Optional argument: a share link, a query string, or a bare `field` value
    let session = match std::env::args().nth(1) {
        Some(arg) if arg.contains('?') => {
            let search = &arg[arg.find('?').unwrap_or(0)..];
            FieldSession::from_query(search, FieldConstants::default())
        }
        Some(payload) => {
            let mut session = FieldSession::default();
            if let Err(e) = session.load_shared(&payload) {
                log::error!("Failed to load field: {}", e);
            }
            session
        }
        None => FieldSession::default(),
    };

    print_report(&session);

    match share::encode_field(&session.shared_field()) {
        Ok(encoded) => println!("\nShare value: {}", encoded),
        Err(e) => log::error!("Failed to encode field: {}", e),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn print_report(session: &fielder_pro::FieldSession) {
    let analysis = session.analysis();

    println!("{}", session.title().unwrap_or("Untitled field"));
    println!("Fielders: {}", session.players().len());
    for fielder in session.players() {
        let radius = analysis
            .discs
            .iter()
            .find(|d| d.fielder_id == fielder.id)
            .map(|d| format!("{:5.2}m", d.radius))
            .unwrap_or_else(|| "    -".to_string());
        println!(
            "  {:<12} {:<16} {:<13} ({:6.1}, {:6.1})  {:>4.0}°  {}",
            fielder.id,
            fielder.name,
            fielder.role.as_str(),
            fielder.position.x,
            fielder.position.z,
            fielder.bearing_from_crease(),
            radius
        );
    }

    println!(
        "\nGaps: {} ({:.0}° uncovered)",
        analysis.gaps.len(),
        analysis.uncovered_degrees()
    );
    for gap in &analysis.gaps {
        println!(
            "  {:>5.0}° - {:>5.0}°  ({:.0}° around {:.0}°)",
            gap.start_deg,
            gap.end_deg,
            gap.span_deg(),
            gap.mid_deg()
        );
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
