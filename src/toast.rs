use std::rc::Rc;

use gloo::timers::callback::Timeout;
use yew::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Error,
}

impl ToastLevel {
    fn class(self) -> &'static str {
        match self {
            ToastLevel::Info => "toast info",
            ToastLevel::Success => "toast success",
            ToastLevel::Error => "toast danger",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
}

impl Toast {
    pub fn info(message: impl Into<String>) -> Self {
        Toast { level: ToastLevel::Info, message: message.into() }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Toast { level: ToastLevel::Success, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Toast { level: ToastLevel::Error, message: message.into() }
    }
}

pub enum ToastAction {
    Push(Toast),
    Dismiss(u64),
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Toasts {
    next_id: u64,
    pub shown: Vec<(u64, Toast)>,
}

impl Toasts {
    pub fn apply(&self, action: ToastAction) -> Toasts {
        let mut next = self.clone();
        match action {
            ToastAction::Push(toast) => {
                next.shown.push((next.next_id, toast));
                next.next_id += 1;
            }
            ToastAction::Dismiss(id) => next.shown.retain(|(shown, _)| *shown != id),
        }
        next
    }

    /// Id the next pushed toast will get.
    pub fn next_id(&self) -> u64 {
        self.next_id
    }
}

impl Reducible for Toasts {
    type Action = ToastAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        Rc::new(self.apply(action))
    }
}

/// Handle components use to raise a notification.
#[derive(Clone, PartialEq)]
pub struct Notifier {
    toasts: UseReducerDispatcher<Toasts>,
    duration_ms: u32,
}

impl Notifier {
    pub fn new(toasts: UseReducerDispatcher<Toasts>, duration_ms: u32) -> Self {
        Notifier { toasts, duration_ms }
    }

    pub fn notify(&self, toast: Toast) {
        self.toasts.dispatch(ToastAction::Push(toast));
    }

    pub fn dismiss_later(&self, id: u64) {
        let toasts = self.toasts.clone();
        Timeout::new(self.duration_ms, move || toasts.dispatch(ToastAction::Dismiss(id))).forget();
    }
}

#[derive(Properties, PartialEq)]
pub struct ToastStackProps {
    pub toasts: Rc<Toasts>,
    pub notifier: Notifier,
}

#[function_component(ToastStack)]
pub fn toast_stack(props: &ToastStackProps) -> Html {
    // Every toast id below `scheduled` already has a dismissal timer.
    let scheduled = use_mut_ref(|| 0_u64);
    {
        let notifier = props.notifier.clone();
        use_effect_with(props.toasts.next_id(), move |next| {
            let mut from = scheduled.borrow_mut();
            for id in *from..*next {
                notifier.dismiss_later(id);
            }
            *from = *next;
        });
    }

    html! {
        <div class="toast-stack" role="status" aria-live="polite">
            { for props.toasts.shown.iter().map(|(id, t)| html! {
                <div key={*id} class={t.level.class()}>{&t.message}</div>
            })}
        </div>
    }
}
