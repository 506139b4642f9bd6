//! Lifecycle callbacks.
//!
//! Callbacks are registered per instance and fire for each of its records.
//! They run while the runtime is mid-operation, so they cannot borrow it
//! mutably; instead they receive a context that can read the document and
//! queue follow-up operations. Queued operations run as soon as the callback
//! returns, before the interrupted operation continues.

use crate::engine::{InstanceId, PopperId};
use crate::settings::Setting;
use poptip_core::{Document, DomEvent, ElementId};
use std::fmt;

/// Lifecycle callback (`onShow`, `onShown`, `onHide`, `onHidden`, `onRequestClose`).
pub type Hook = Box<dyn FnMut(&mut HookContext<'_>)>;

/// Show gate; receives the triggering event and decides when to proceed.
pub type WaitHook = Box<dyn FnMut(&mut WaitContext<'_>)>;

/// Rich content renderer, called with the record's content slot.
pub type ContentHook = Box<dyn FnMut(&mut Document, ElementId)>;

/// Operations a callback may request.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Command {
    Show(PopperId),
    Hide(PopperId),
    ScheduleShow(PopperId),
    Update(PopperId),
    UpdateSettings(PopperId, Setting),
    Enable(PopperId),
    Disable(PopperId),
    Destroy(PopperId),
    DestroyAll(InstanceId),
}

/// Context passed to lifecycle callbacks.
pub struct HookContext<'a> {
    document: &'a Document,
    popper: PopperId,
    instance: InstanceId,
    commands: &'a mut Vec<Command>,
}

impl<'a> HookContext<'a> {
    pub(crate) fn new(
        document: &'a Document,
        popper: PopperId,
        instance: InstanceId,
        commands: &'a mut Vec<Command>,
    ) -> Self {
        Self {
            document,
            popper,
            instance,
            commands,
        }
    }

    /// Popper the callback fired for.
    pub fn popper(&self) -> PopperId {
        self.popper
    }

    /// Owning instance.
    pub fn instance(&self) -> InstanceId {
        self.instance
    }

    /// Read-only view of the document.
    pub fn document(&self) -> &Document {
        self.document
    }

    /// Show this tooltip.
    pub fn show(&mut self) {
        self.commands.push(Command::Show(self.popper));
    }

    /// Hide this tooltip.
    pub fn hide(&mut self) {
        self.commands.push(Command::Hide(self.popper));
    }

    /// Refresh this tooltip's content.
    pub fn update(&mut self) {
        self.commands.push(Command::Update(self.popper));
    }

    /// Patch one setting of this tooltip.
    pub fn update_settings(&mut self, setting: Setting) {
        self.commands.push(Command::UpdateSettings(self.popper, setting));
    }

    /// Enable this tooltip.
    pub fn enable(&mut self) {
        self.commands.push(Command::Enable(self.popper));
    }

    /// Disable this tooltip.
    pub fn disable(&mut self) {
        self.commands.push(Command::Disable(self.popper));
    }

    /// Destroy this tooltip.
    pub fn destroy(&mut self) {
        self.commands.push(Command::Destroy(self.popper));
    }

    /// Destroy every tooltip of the owning instance.
    pub fn destroy_all(&mut self) {
        self.commands.push(Command::DestroyAll(self.instance));
    }
}

/// Context passed to the `wait` gate.
pub struct WaitContext<'a> {
    hook: HookContext<'a>,
    event: &'a DomEvent,
}

impl<'a> WaitContext<'a> {
    pub(crate) fn new(hook: HookContext<'a>, event: &'a DomEvent) -> Self {
        Self { hook, event }
    }

    /// Event that triggered the show.
    pub fn event(&self) -> &DomEvent {
        self.event
    }

    /// Popper that would be shown.
    pub fn popper(&self) -> PopperId {
        self.hook.popper
    }

    /// Read-only view of the document.
    pub fn document(&self) -> &Document {
        self.hook.document
    }

    /// Go ahead with the show, honoring `delay`.
    ///
    /// A gate that wants to show later instead can call
    /// [`Tooltips::show`](crate::Tooltips::show) itself once ready.
    pub fn proceed(&mut self) {
        self.hook.commands.push(Command::ScheduleShow(self.hook.popper));
    }

    /// The full callback context.
    pub fn context(&mut self) -> &mut HookContext<'a> {
        &mut self.hook
    }
}

/// Which lifecycle callback to fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HookKind {
    Show,
    Shown,
    Hide,
    Hidden,
    RequestClose,
}

/// Which content callback to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ContentKind {
    Render,
    Unmount,
}

/// Callbacks shared by every record of an instance.
#[derive(Default)]
pub struct Callbacks {
    wait: Option<WaitHook>,
    show: Option<Hook>,
    shown: Option<Hook>,
    hide: Option<Hook>,
    hidden: Option<Hook>,
    request_close: Option<Hook>,
    render_content: Option<ContentHook>,
    unmount_content: Option<ContentHook>,
}

impl Callbacks {
    /// No callbacks.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gate every trigger-driven show.
    #[must_use]
    pub fn wait(mut self, f: impl FnMut(&mut WaitContext<'_>) + 'static) -> Self {
        self.wait = Some(Box::new(f));
        self
    }

    /// Fired when a show starts.
    #[must_use]
    pub fn on_show(mut self, f: impl FnMut(&mut HookContext<'_>) + 'static) -> Self {
        self.show = Some(Box::new(f));
        self
    }

    /// Fired once the show transition completes.
    #[must_use]
    pub fn on_shown(mut self, f: impl FnMut(&mut HookContext<'_>) + 'static) -> Self {
        self.shown = Some(Box::new(f));
        self
    }

    /// Fired when a hide starts.
    #[must_use]
    pub fn on_hide(mut self, f: impl FnMut(&mut HookContext<'_>) + 'static) -> Self {
        self.hide = Some(Box::new(f));
        self
    }

    /// Fired once the popper is removed from its container.
    #[must_use]
    pub fn on_hidden(mut self, f: impl FnMut(&mut HookContext<'_>) + 'static) -> Self {
        self.hidden = Some(Box::new(f));
        self
    }

    /// Fired before a click-outside dismissal hides the tooltip.
    #[must_use]
    pub fn on_request_close(mut self, f: impl FnMut(&mut HookContext<'_>) + 'static) -> Self {
        self.request_close = Some(Box::new(f));
        self
    }

    /// Render rich content into the content slot on every show.
    #[must_use]
    pub fn render_content(mut self, f: impl FnMut(&mut Document, ElementId) + 'static) -> Self {
        self.render_content = Some(Box::new(f));
        self
    }

    /// Unmount rich content after hiding (with `unmountHTMLWhenHide`).
    #[must_use]
    pub fn unmount_content(mut self, f: impl FnMut(&mut Document, ElementId) + 'static) -> Self {
        self.unmount_content = Some(Box::new(f));
        self
    }

    pub(crate) const fn has_wait(&self) -> bool {
        self.wait.is_some()
    }

    pub(crate) const fn has_renderer(&self) -> bool {
        self.render_content.is_some()
    }

    pub(crate) fn hook_slot(&mut self, kind: HookKind) -> &mut Option<Hook> {
        match kind {
            HookKind::Show => &mut self.show,
            HookKind::Shown => &mut self.shown,
            HookKind::Hide => &mut self.hide,
            HookKind::Hidden => &mut self.hidden,
            HookKind::RequestClose => &mut self.request_close,
        }
    }

    pub(crate) fn wait_slot(&mut self) -> &mut Option<WaitHook> {
        &mut self.wait
    }

    pub(crate) fn content_slot(&mut self, kind: ContentKind) -> &mut Option<ContentHook> {
        match kind {
            ContentKind::Render => &mut self.render_content,
            ContentKind::Unmount => &mut self.unmount_content,
        }
    }
}

impl fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callbacks")
            .field("wait", &self.wait.is_some())
            .field("show", &self.show.is_some())
            .field("shown", &self.shown.is_some())
            .field("hide", &self.hide.is_some())
            .field("hidden", &self.hidden.is_some())
            .field("request_close", &self.request_close.is_some())
            .field("render_content", &self.render_content.is_some())
            .field("unmount_content", &self.unmount_content.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_queues_commands() {
        let doc = Document::new();
        let mut commands = Vec::new();
        let popper = ElementId(9);
        {
            let mut ctx = HookContext::new(&doc, popper, InstanceId(2), &mut commands);
            assert_eq!(ctx.popper(), popper);
            ctx.hide();
            ctx.update_settings(Setting::Arrow(true));
            ctx.destroy_all();
        }
        assert_eq!(
            commands,
            vec![
                Command::Hide(popper),
                Command::UpdateSettings(popper, Setting::Arrow(true)),
                Command::DestroyAll(InstanceId(2)),
            ]
        );
    }

    #[test]
    fn test_wait_proceed_schedules_show() {
        let doc = Document::new();
        let mut commands = Vec::new();
        let event = DomEvent::new(poptip_core::EventKind::MouseEnter, ElementId(3));
        {
            let hook = HookContext::new(&doc, ElementId(4), InstanceId(0), &mut commands);
            let mut ctx = WaitContext::new(hook, &event);
            assert_eq!(ctx.event().target, ElementId(3));
            ctx.proceed();
        }
        assert_eq!(commands, vec![Command::ScheduleShow(ElementId(4))]);
    }

    #[test]
    fn test_slots_take_and_restore() {
        let mut callbacks = Callbacks::new().on_show(|_| {});
        let hook = callbacks.hook_slot(HookKind::Show).take();
        assert!(hook.is_some());
        assert!(callbacks.hook_slot(HookKind::Show).is_none());
        *callbacks.hook_slot(HookKind::Show) = hook;
        assert!(format!("{callbacks:?}").contains("show: true"));
        assert!(!callbacks.has_wait());
    }
}
