use crate::config::{self, Config};
use crate::events::AppEvent;
use crate::gui::knob::{self, DialGeometry, DragAction, Point, State};
use crate::gui::theme::{self, KnobStyle};
use gtk::prelude::*;
use gtk4 as gtk;
use relm4::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;

pub struct AppModel {
    pub state: Rc<RefCell<State>>,
    pub config: Rc<RefCell<Config>>,
    pub root: gtk::ApplicationWindow,
    pub drawing_area: gtk::DrawingArea,
}

#[derive(Debug)]
pub enum AppMsg {
    PointerDown(Point),
    PointerDrag(Point),
    PointerUp(Point),
    /// Programmatic selection step, from the arrow keys.
    StepValue(i64),
    ConfigReload,
    Quit,
}

impl From<AppEvent> for AppMsg {
    fn from(event: AppEvent) -> Self {
        match event {
            AppEvent::ConfigReload => AppMsg::ConfigReload,
        }
    }
}

#[relm4::component(pub)]
impl SimpleComponent for AppModel {
    type Init = (State, Config, async_channel::Receiver<AppEvent>);
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        #[name = "window"]
        gtk::ApplicationWindow {
            set_title: Some("Rondel"),
            set_default_size: (360, 440),
            add_css_class: "rondel-window",

            add_controller = gtk::EventControllerKey {
                connect_key_pressed[sender] => move |_, key, _, _| {
                    match key {
                        gtk::gdk::Key::Left => {
                            sender.input(AppMsg::StepValue(-1));
                            glib::Propagation::Stop
                        }
                        gtk::gdk::Key::Right => {
                            sender.input(AppMsg::StepValue(1));
                            glib::Propagation::Stop
                        }
                        gtk::gdk::Key::Escape => {
                            sender.input(AppMsg::Quit);
                            glib::Propagation::Stop
                        }
                        _ => glib::Propagation::Proceed,
                    }
                }
            },

            #[name = "drawing_area"]
            gtk::DrawingArea {
                set_hexpand: true,
                set_vexpand: true,
                set_content_width: 180,
                set_content_height: 220,
                add_css_class: "rondel-dial",

                // GestureDrag keeps the pointer grabbed for the whole
                // press-move-release sequence.
                add_controller = gtk::GestureDrag {
                    connect_drag_begin[sender] => move |_, x, y| {
                        sender.input(AppMsg::PointerDown(Point::new(x, y)));
                    },
                    connect_drag_update[sender] => move |gesture, dx, dy| {
                        if let Some((x, y)) = gesture.start_point() {
                            sender.input(AppMsg::PointerDrag(Point::new(x + dx, y + dy)));
                        }
                    },
                    connect_drag_end[sender] => move |gesture, dx, dy| {
                        if let Some((x, y)) = gesture.start_point() {
                            sender.input(AppMsg::PointerUp(Point::new(x + dx, y + dy)));
                        }
                    }
                }
            }
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let (state, cfg, rx) = init;

        theme::load_css();

        let state = Rc::new(RefCell::new(state));
        let cfg = Rc::new(RefCell::new(cfg));

        let model = AppModel {
            state: state.clone(),
            config: cfg.clone(),
            root: root.clone(),
            drawing_area: gtk::DrawingArea::default(),
        };

        let widgets = view_output!();

        let mut model = model;
        model.drawing_area = widgets.drawing_area.clone();

        let state_draw = state.clone();
        let config_draw = cfg.clone();
        widgets
            .drawing_area
            .set_draw_func(move |drawing_area, cr, width, height| {
                let style =
                    KnobStyle::resolve(&config_draw.borrow(), &drawing_area.style_context());
                let geometry = DialGeometry::from_bounds(width as f64, height as f64);
                if let Err(e) = knob::draw(cr, &state_draw.borrow(), &style, &geometry) {
                    log::error!("Drawing error: {}", e);
                }
            });

        let sender_clone = sender.clone();
        relm4::spawn(async move {
            while let Ok(event) = rx.recv().await {
                sender_clone.input(AppMsg::from(event));
            }
        });

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, _sender: ComponentSender<Self>) {
        match msg {
            AppMsg::PointerDown(point) => {
                let action = self.state.borrow_mut().begin_drag(&self.geometry(), point);
                self.apply(action);
            }
            AppMsg::PointerDrag(point) => {
                let action = self.state.borrow_mut().update_drag(&self.geometry(), point);
                self.apply(action);
            }
            AppMsg::PointerUp(point) => {
                let action = self.state.borrow_mut().end_drag(&self.geometry(), point);
                self.apply(action);
            }
            AppMsg::StepValue(delta) => {
                let mut state = self.state.borrow_mut();
                let current = state.value();
                let effective = state.set_value(current.saturating_add_signed(delta as isize));
                let value = state.selected_value().to_string();
                drop(state);

                if effective != current {
                    log::info!("Selected '{}' (index {})", value, effective);
                }
                self.drawing_area.queue_draw();
            }
            AppMsg::ConfigReload => match config::load_config() {
                Ok(new_config) => {
                    self.state
                        .borrow_mut()
                        .set_labels(new_config.labels.clone());
                    *self.config.borrow_mut() = new_config;
                    self.drawing_area.queue_draw();
                    log::info!("Configuration reloaded");
                }
                Err(e) => log::error!("Failed to reload config: {}", e),
            },
            AppMsg::Quit => self.root.close(),
        }
    }
}

impl AppModel {
    fn geometry(&self) -> DialGeometry {
        DialGeometry::from_bounds(
            self.drawing_area.width() as f64,
            self.drawing_area.height() as f64,
        )
    }

    fn apply(&self, action: DragAction) {
        if action.committed {
            let state = self.state.borrow();
            log::info!(
                "Selected '{}' (index {})",
                state.selected_value(),
                state.value()
            );
            if action.changed
                && let Some(display) = gtk::gdk::Display::default()
            {
                display.beep();
            }
        }
        if action.should_redraw {
            self.drawing_area.queue_draw();
        }
    }
}
