//! Tooltip settings.
//!
//! [`Settings`] is the closed, fully populated option set every record
//! carries. [`SettingsInput`] mirrors it with every field optional: `None`
//! (and a `null` in JSON or YAML) means "unset", so merging an input over the
//! defaults is a total function. [`Setting`] is a single key/value patch, the
//! unit the hosting framework sends when one of its properties changes.

use crate::error::ConfigError;
use crate::placement::PopperOptionsInput;
use poptip_core::{Document, ElementId};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

// =============================================================================
// Position
// =============================================================================

/// Core side of a placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Above the reference
    Top,
    /// Below the reference
    Bottom,
    /// Left of the reference
    Left,
    /// Right of the reference
    Right,
}

impl Side {
    /// CSS property / placement name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    /// The opposite side.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::Bottom => Self::Top,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Whether the popper sits above or below the reference.
    #[must_use]
    pub const fn is_vertical(self) -> bool {
        matches!(self, Self::Top | Self::Bottom)
    }
}

/// Alignment of the popper along the reference edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Alignment {
    /// Centered on the reference
    Center,
    /// Aligned to the reference's start edge
    Start,
    /// Aligned to the reference's end edge
    End,
}

/// Preferred popper placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Position {
    /// Above, centered
    #[default]
    Top,
    /// Above, start-aligned
    TopStart,
    /// Above, end-aligned
    TopEnd,
    /// Below, centered
    Bottom,
    /// Below, start-aligned
    BottomStart,
    /// Below, end-aligned
    BottomEnd,
    /// Left, centered
    Left,
    /// Left, start-aligned
    LeftStart,
    /// Left, end-aligned
    LeftEnd,
    /// Right, centered
    Right,
    /// Right, start-aligned
    RightStart,
    /// Right, end-aligned
    RightEnd,
}

impl Position {
    /// All placements.
    pub const ALL: [Self; 12] = [
        Self::Top,
        Self::TopStart,
        Self::TopEnd,
        Self::Bottom,
        Self::BottomStart,
        Self::BottomEnd,
        Self::Left,
        Self::LeftStart,
        Self::LeftEnd,
        Self::Right,
        Self::RightStart,
        Self::RightEnd,
    ];

    /// Build a placement from its parts.
    #[must_use]
    pub const fn from_parts(side: Side, alignment: Alignment) -> Self {
        match (side, alignment) {
            (Side::Top, Alignment::Center) => Self::Top,
            (Side::Top, Alignment::Start) => Self::TopStart,
            (Side::Top, Alignment::End) => Self::TopEnd,
            (Side::Bottom, Alignment::Center) => Self::Bottom,
            (Side::Bottom, Alignment::Start) => Self::BottomStart,
            (Side::Bottom, Alignment::End) => Self::BottomEnd,
            (Side::Left, Alignment::Center) => Self::Left,
            (Side::Left, Alignment::Start) => Self::LeftStart,
            (Side::Left, Alignment::End) => Self::LeftEnd,
            (Side::Right, Alignment::Center) => Self::Right,
            (Side::Right, Alignment::Start) => Self::RightStart,
            (Side::Right, Alignment::End) => Self::RightEnd,
        }
    }

    /// Core side, with any `-start`/`-end` suffix dropped.
    #[must_use]
    pub const fn side(self) -> Side {
        match self {
            Self::Top | Self::TopStart | Self::TopEnd => Side::Top,
            Self::Bottom | Self::BottomStart | Self::BottomEnd => Side::Bottom,
            Self::Left | Self::LeftStart | Self::LeftEnd => Side::Left,
            Self::Right | Self::RightStart | Self::RightEnd => Side::Right,
        }
    }

    /// Alignment suffix.
    #[must_use]
    pub const fn alignment(self) -> Alignment {
        match self {
            Self::Top | Self::Bottom | Self::Left | Self::Right => Alignment::Center,
            Self::TopStart | Self::BottomStart | Self::LeftStart | Self::RightStart => {
                Alignment::Start
            }
            Self::TopEnd | Self::BottomEnd | Self::LeftEnd | Self::RightEnd => Alignment::End,
        }
    }

    /// Same alignment on the opposite side.
    #[must_use]
    pub const fn flipped(self) -> Self {
        Self::from_parts(self.side().opposite(), self.alignment())
    }

    /// Placement name, e.g. `"bottom-start"`.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::TopStart => "top-start",
            Self::TopEnd => "top-end",
            Self::Bottom => "bottom",
            Self::BottomStart => "bottom-start",
            Self::BottomEnd => "bottom-end",
            Self::Left => "left",
            Self::LeftStart => "left-start",
            Self::LeftEnd => "left-end",
            Self::Right => "right",
            Self::RightStart => "right-start",
            Self::RightEnd => "right-end",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Position {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.name() == s)
            .ok_or_else(|| ConfigError::UnknownPosition(s.to_string()))
    }
}

// =============================================================================
// Trigger
// =============================================================================

/// A single trigger word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriggerEvent {
    /// Hover
    MouseEnter,
    /// Focus on the reference itself
    Focus,
    /// Focus on the reference or a descendant
    FocusIn,
    /// Click toggles
    Click,
    /// Bind nothing; the caller drives show and hide
    Manual,
}

impl TriggerEvent {
    /// Trigger word.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::MouseEnter => "mouseenter",
            Self::Focus => "focus",
            Self::FocusIn => "focusin",
            Self::Click => "click",
            Self::Manual => "manual",
        }
    }
}

impl FromStr for TriggerEvent {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mouseenter" => Ok(Self::MouseEnter),
            "focus" => Ok(Self::Focus),
            "focusin" => Ok(Self::FocusIn),
            "click" => Ok(Self::Click),
            "manual" => Ok(Self::Manual),
            other => Err(ConfigError::UnknownTrigger(other.to_string())),
        }
    }
}

/// Space-delimited trigger list, e.g. `"mouseenter focus"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Trigger(Vec<TriggerEvent>);

impl Trigger {
    /// Build a trigger list from words, keeping their order.
    #[must_use]
    pub fn new(events: impl IntoIterator<Item = TriggerEvent>) -> Self {
        Self(events.into_iter().collect())
    }

    /// The manual trigger.
    #[must_use]
    pub fn manual() -> Self {
        Self(vec![TriggerEvent::Manual])
    }

    /// Whether the list contains `event`.
    #[must_use]
    pub fn contains(&self, event: TriggerEvent) -> bool {
        self.0.contains(&event)
    }

    /// Trigger words in order.
    #[must_use]
    pub fn events(&self) -> &[TriggerEvent] {
        &self.0
    }
}

impl Default for Trigger {
    fn default() -> Self {
        Self(vec![TriggerEvent::MouseEnter, TriggerEvent::Focus])
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, event) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            f.write_str(event.name())?;
        }
        Ok(())
    }
}

impl FromStr for Trigger {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split_whitespace()
            .map(TriggerEvent::from_str)
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

impl TryFrom<String> for Trigger {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Trigger> for String {
    fn from(trigger: Trigger) -> Self {
        trigger.to_string()
    }
}

// =============================================================================
// Small value types
// =============================================================================

/// Show/hide animation style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Animation {
    /// Slide away from the reference
    #[default]
    Shift,
    /// 3D tilt
    Perspective,
    /// Opacity only
    Fade,
    /// Grow from the reference
    Scale,
    /// No animation
    None,
}

impl Animation {
    /// Value of the `data-animation` attribute.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Shift => "shift",
            Self::Perspective => "perspective",
            Self::Fade => "fade",
            Self::Scale => "scale",
            Self::None => "none",
        }
    }
}

/// Size variant for the tooltip box and its arrow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TooltipSize {
    /// Small
    Small,
    /// Regular
    #[default]
    Regular,
    /// Big
    Big,
}

impl TooltipSize {
    /// Class suffix.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Regular => "regular",
            Self::Big => "big",
        }
    }
}

/// A millisecond value that is either shared or split into `[show, hide]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timing {
    /// Same value for show and hide
    Single(u64),
    /// `[show, hide]`
    Pair(u64, u64),
}

impl Timing {
    /// Value applied when showing.
    #[must_use]
    pub const fn show(self) -> u64 {
        match self {
            Self::Single(ms) | Self::Pair(ms, _) => ms,
        }
    }

    /// Value applied when hiding.
    #[must_use]
    pub const fn hide(self) -> u64 {
        match self {
            Self::Single(ms) | Self::Pair(_, ms) => ms,
        }
    }
}

impl Default for Timing {
    fn default() -> Self {
        Self::Single(0)
    }
}

impl From<u64> for Timing {
    fn from(ms: u64) -> Self {
        Self::Single(ms)
    }
}

impl From<(u64, u64)> for Timing {
    fn from((show, hide): (u64, u64)) -> Self {
        Self::Pair(show, hide)
    }
}

/// Whether clicking outside (or on the reference) hides the tooltip.
///
/// Serialized as `true`, `false` or `"persistent"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(try_from = "HideOnClickRepr")]
pub enum HideOnClick {
    /// Hide on outside clicks and toggle on reference clicks
    #[default]
    Enabled,
    /// Never hide on outside clicks
    Disabled,
    /// Outside clicks never hide, and a click on the reference never toggles off
    Persistent,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum HideOnClickRepr {
    Flag(bool),
    Mode(String),
}

impl TryFrom<HideOnClickRepr> for HideOnClick {
    type Error = ConfigError;

    fn try_from(repr: HideOnClickRepr) -> Result<Self, Self::Error> {
        match repr {
            HideOnClickRepr::Flag(true) => Ok(Self::Enabled),
            HideOnClickRepr::Flag(false) => Ok(Self::Disabled),
            HideOnClickRepr::Mode(mode) if mode == "persistent" => Ok(Self::Persistent),
            HideOnClickRepr::Mode(mode) => Err(ConfigError::InvalidValue {
                key: "hideOnClick".to_string(),
                value: mode,
            }),
        }
    }
}

impl Serialize for HideOnClick {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Enabled => serializer.serialize_bool(true),
            Self::Disabled => serializer.serialize_bool(false),
            Self::Persistent => serializer.serialize_str("persistent"),
        }
    }
}

/// Rich content source for the content slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HtmlContent {
    /// Selector of a template element whose content is copied, e.g. `"#my-template"`
    Template(String),
    /// Element moved into the content slot
    Element(ElementId),
}

/// Function producing the popper container, resolved once at evaluation.
#[derive(Clone)]
pub struct ContainerResolver(Rc<dyn Fn(&Document) -> ElementId>);

impl ContainerResolver {
    /// Wrap a resolver function.
    pub fn new(f: impl Fn(&Document) -> ElementId + 'static) -> Self {
        Self(Rc::new(f))
    }

    /// Invoke the resolver.
    #[must_use]
    pub fn resolve(&self, doc: &Document) -> ElementId {
        (self.0)(doc)
    }
}

impl fmt::Debug for ContainerResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ContainerResolver(..)")
    }
}

impl PartialEq for ContainerResolver {
    fn eq(&self, other: &Self) -> bool {
        Rc::as_ptr(&self.0).cast::<()>() == Rc::as_ptr(&other.0).cast::<()>()
    }
}

/// Where the popper is mounted.
///
/// Serialized as `"body"` or an element id; resolvers are not serializable.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(try_from = "AppendToRepr")]
pub enum AppendTo {
    /// The document body
    #[default]
    Body,
    /// A concrete container
    Element(ElementId),
    /// A function evaluated once into [`AppendTo::Element`]
    Resolver(ContainerResolver),
}

impl AppendTo {
    /// Container element for this setting.
    #[must_use]
    pub fn container(&self, doc: &Document) -> ElementId {
        match self {
            Self::Body => doc.body(),
            Self::Element(el) => *el,
            Self::Resolver(resolver) => resolver.resolve(doc),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AppendToRepr {
    Element(ElementId),
    Named(String),
}

impl TryFrom<AppendToRepr> for AppendTo {
    type Error = ConfigError;

    fn try_from(repr: AppendToRepr) -> Result<Self, Self::Error> {
        match repr {
            AppendToRepr::Element(el) => Ok(Self::Element(el)),
            AppendToRepr::Named(name) if name == "body" => Ok(Self::Body),
            AppendToRepr::Named(name) => Err(ConfigError::InvalidValue {
                key: "appendTo".to_string(),
                value: name,
            }),
        }
    }
}

impl Serialize for AppendTo {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Body => serializer.serialize_str("body"),
            Self::Element(el) => el.serialize(serializer),
            Self::Resolver(_) => Err(serde::ser::Error::custom(
                "container resolvers cannot be serialized",
            )),
        }
    }
}

// =============================================================================
// Settings
// =============================================================================

/// Fully populated tooltip settings.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Preferred placement
    pub position: Position,
    /// Animation style
    pub animation: Animation,
    /// Fill-circle background animation (forced off by `arrow`)
    pub animate_fill: bool,
    /// Render an arrow pointing at the reference
    pub arrow: bool,
    /// Arrow size
    pub arrow_size: TooltipSize,
    /// Delay before showing / hiding in response to events
    pub delay: Timing,
    /// Events that show the tooltip
    pub trigger: Trigger,
    /// Transition duration for show / hide
    pub duration: Timing,
    /// Hide transition duration overriding `duration`
    pub hide_duration: Option<u64>,
    /// Keep the tooltip open while the cursor is over it
    pub interactive: bool,
    /// Extra margin around an interactive popper before it hides
    pub interactive_border: f32,
    /// Space-delimited theme names
    pub theme: String,
    /// Tooltip box size
    pub size: TooltipSize,
    /// Gap between the reference and the popper
    pub distance: f32,
    /// Placement offset `(x, y)`
    pub offset: (f32, f32),
    /// Click dismissal mode
    pub hide_on_click: HideOnClick,
    /// Interactive tooltips hide when the document scrolls
    pub hide_on_scroll: bool,
    /// Allow several tooltips to stay open at once
    pub multiple: bool,
    /// Position the popper at the cursor
    pub follow_cursor: bool,
    /// Elastic transition timing
    pub inertia: bool,
    /// Popper transition duration when it flips sides
    pub flip_duration: u64,
    /// Reposition every animation frame while visible
    pub sticky: bool,
    /// Popper transition duration while sticky
    pub sticky_duration: u64,
    /// Popper container
    pub append_to: AppendTo,
    /// Popper stacking order
    pub z_index: i32,
    /// Show on touch-and-hold instead of tap
    pub touch_hold: bool,
    /// Overrides for the options handed to the placement solver
    pub popper_options: PopperOptionsInput,
    /// Controlled visibility; `None` leaves visibility to triggers
    pub open: Option<bool>,
    /// Set by `disable()`; a disabled tooltip may be hidden even while
    /// `open` is `Some(true)`. Showing is blocked by the reference's
    /// `disabled` attribute, not by this flag.
    pub disabled: bool,
    /// Rich content source
    pub html: Option<HtmlContent>,
    /// Unmount rich content once hidden
    #[serde(rename = "unmountHTMLWhenHide")]
    pub unmount_html_when_hide: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            position: Position::Top,
            animation: Animation::Shift,
            animate_fill: true,
            arrow: false,
            arrow_size: TooltipSize::Regular,
            delay: Timing::Single(0),
            trigger: Trigger::default(),
            duration: Timing::Single(350),
            hide_duration: None,
            interactive: false,
            interactive_border: 2.0,
            theme: "dark".to_string(),
            size: TooltipSize::Regular,
            distance: 10.0,
            offset: (0.0, 0.0),
            hide_on_click: HideOnClick::Enabled,
            hide_on_scroll: false,
            multiple: false,
            follow_cursor: false,
            inertia: false,
            flip_duration: 350,
            sticky: false,
            sticky_duration: 200,
            append_to: AppendTo::Body,
            z_index: 9999,
            touch_hold: false,
            popper_options: PopperOptionsInput::default(),
            open: None,
            disabled: false,
            html: None,
            unmount_html_when_hide: false,
        }
    }
}

impl Settings {
    /// Show transition duration in milliseconds.
    #[must_use]
    pub const fn show_duration(&self) -> u64 {
        self.duration.show()
    }

    /// Hide transition duration in milliseconds; `hideDuration` wins over `duration`.
    #[must_use]
    pub fn hide_duration_ms(&self) -> u64 {
        self.hide_duration.unwrap_or_else(|| self.duration.hide())
    }

    /// Whether visibility is driven by `open` instead of triggers.
    #[must_use]
    pub const fn is_controlled(&self) -> bool {
        self.open.is_some()
    }

    /// Individual theme names.
    pub fn themes(&self) -> impl Iterator<Item = &str> {
        self.theme.split_whitespace()
    }
}

// =============================================================================
// SettingsInput
// =============================================================================

/// Partial settings; unset fields fall back to the defaults on merge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct SettingsInput {
    pub position: Option<Position>,
    pub animation: Option<Animation>,
    pub animate_fill: Option<bool>,
    pub arrow: Option<bool>,
    pub arrow_size: Option<TooltipSize>,
    pub delay: Option<Timing>,
    pub trigger: Option<Trigger>,
    pub duration: Option<Timing>,
    pub hide_duration: Option<u64>,
    pub interactive: Option<bool>,
    pub interactive_border: Option<f32>,
    pub theme: Option<String>,
    pub size: Option<TooltipSize>,
    pub distance: Option<f32>,
    pub offset: Option<(f32, f32)>,
    pub hide_on_click: Option<HideOnClick>,
    pub hide_on_scroll: Option<bool>,
    pub multiple: Option<bool>,
    pub follow_cursor: Option<bool>,
    pub inertia: Option<bool>,
    pub flip_duration: Option<u64>,
    pub sticky: Option<bool>,
    pub sticky_duration: Option<u64>,
    pub append_to: Option<AppendTo>,
    pub z_index: Option<i32>,
    pub touch_hold: Option<bool>,
    pub popper_options: Option<PopperOptionsInput>,
    pub open: Option<bool>,
    pub disabled: Option<bool>,
    pub html: Option<HtmlContent>,
    #[serde(rename = "unmountHTMLWhenHide")]
    pub unmount_html_when_hide: Option<bool>,
}

impl SettingsInput {
    /// Empty input (every field unset).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set one field.
    #[must_use]
    pub fn with(mut self, setting: Setting) -> Self {
        setting.record(&mut self);
        self
    }

    /// Merge over `defaults`; unset fields keep the default.
    #[must_use]
    pub fn merge(self, defaults: &Settings) -> Settings {
        let d = defaults.clone();
        Settings {
            position: self.position.unwrap_or(d.position),
            animation: self.animation.unwrap_or(d.animation),
            animate_fill: self.animate_fill.unwrap_or(d.animate_fill),
            arrow: self.arrow.unwrap_or(d.arrow),
            arrow_size: self.arrow_size.unwrap_or(d.arrow_size),
            delay: self.delay.unwrap_or(d.delay),
            trigger: self.trigger.unwrap_or(d.trigger),
            duration: self.duration.unwrap_or(d.duration),
            hide_duration: self.hide_duration.or(d.hide_duration),
            interactive: self.interactive.unwrap_or(d.interactive),
            interactive_border: self.interactive_border.unwrap_or(d.interactive_border),
            theme: self.theme.unwrap_or(d.theme),
            size: self.size.unwrap_or(d.size),
            distance: self.distance.unwrap_or(d.distance),
            offset: self.offset.unwrap_or(d.offset),
            hide_on_click: self.hide_on_click.unwrap_or(d.hide_on_click),
            hide_on_scroll: self.hide_on_scroll.unwrap_or(d.hide_on_scroll),
            multiple: self.multiple.unwrap_or(d.multiple),
            follow_cursor: self.follow_cursor.unwrap_or(d.follow_cursor),
            inertia: self.inertia.unwrap_or(d.inertia),
            flip_duration: self.flip_duration.unwrap_or(d.flip_duration),
            sticky: self.sticky.unwrap_or(d.sticky),
            sticky_duration: self.sticky_duration.unwrap_or(d.sticky_duration),
            append_to: self.append_to.unwrap_or(d.append_to),
            z_index: self.z_index.unwrap_or(d.z_index),
            touch_hold: self.touch_hold.unwrap_or(d.touch_hold),
            popper_options: self.popper_options.unwrap_or(d.popper_options),
            open: self.open.or(d.open),
            disabled: self.disabled.unwrap_or(d.disabled),
            html: self.html.or(d.html),
            unmount_html_when_hide: self
                .unmount_html_when_hide
                .unwrap_or(d.unmount_html_when_hide),
        }
    }

    /// One patch per set field, in declaration order.
    #[must_use]
    pub fn patches(&self) -> Vec<Setting> {
        let s = self.clone();
        let mut out = Vec::new();
        let mut push = |setting: Option<Setting>| out.extend(setting);
        push(s.position.map(Setting::Position));
        push(s.animation.map(Setting::Animation));
        push(s.animate_fill.map(Setting::AnimateFill));
        push(s.arrow.map(Setting::Arrow));
        push(s.arrow_size.map(Setting::ArrowSize));
        push(s.delay.map(Setting::Delay));
        push(s.trigger.map(Setting::Trigger));
        push(s.duration.map(Setting::Duration));
        push(s.hide_duration.map(|ms| Setting::HideDuration(Some(ms))));
        push(s.interactive.map(Setting::Interactive));
        push(s.interactive_border.map(Setting::InteractiveBorder));
        push(s.theme.map(Setting::Theme));
        push(s.size.map(Setting::Size));
        push(s.distance.map(Setting::Distance));
        push(s.offset.map(|(x, y)| Setting::Offset(x, y)));
        push(s.hide_on_click.map(Setting::HideOnClick));
        push(s.hide_on_scroll.map(Setting::HideOnScroll));
        push(s.multiple.map(Setting::Multiple));
        push(s.follow_cursor.map(Setting::FollowCursor));
        push(s.inertia.map(Setting::Inertia));
        push(s.flip_duration.map(Setting::FlipDuration));
        push(s.sticky.map(Setting::Sticky));
        push(s.sticky_duration.map(Setting::StickyDuration));
        push(s.append_to.map(Setting::AppendTo));
        push(s.z_index.map(Setting::ZIndex));
        push(s.touch_hold.map(Setting::TouchHold));
        push(s.popper_options.map(Setting::PopperOptions));
        push(s.open.map(|open| Setting::Open(Some(open))));
        push(s.disabled.map(Setting::Disabled));
        push(s.html.map(|html| Setting::Html(Some(html))));
        push(s.unmount_html_when_hide.map(Setting::UnmountHtmlWhenHide));
        out
    }
}

// =============================================================================
// Setting
// =============================================================================

/// A single-key settings patch.
#[derive(Debug, Clone, PartialEq)]
pub enum Setting {
    Position(Position),
    Animation(Animation),
    AnimateFill(bool),
    Arrow(bool),
    ArrowSize(TooltipSize),
    Delay(Timing),
    Trigger(Trigger),
    Duration(Timing),
    HideDuration(Option<u64>),
    Interactive(bool),
    InteractiveBorder(f32),
    Theme(String),
    Size(TooltipSize),
    Distance(f32),
    Offset(f32, f32),
    HideOnClick(HideOnClick),
    HideOnScroll(bool),
    Multiple(bool),
    FollowCursor(bool),
    Inertia(bool),
    FlipDuration(u64),
    Sticky(bool),
    StickyDuration(u64),
    AppendTo(AppendTo),
    ZIndex(i32),
    TouchHold(bool),
    PopperOptions(PopperOptionsInput),
    Open(Option<bool>),
    Disabled(bool),
    Html(Option<HtmlContent>),
    UnmountHtmlWhenHide(bool),
}

impl Setting {
    /// Settings key, as it appears in JSON and YAML.
    #[must_use]
    pub const fn key(&self) -> &'static str {
        match self {
            Self::Position(_) => "position",
            Self::Animation(_) => "animation",
            Self::AnimateFill(_) => "animateFill",
            Self::Arrow(_) => "arrow",
            Self::ArrowSize(_) => "arrowSize",
            Self::Delay(_) => "delay",
            Self::Trigger(_) => "trigger",
            Self::Duration(_) => "duration",
            Self::HideDuration(_) => "hideDuration",
            Self::Interactive(_) => "interactive",
            Self::InteractiveBorder(_) => "interactiveBorder",
            Self::Theme(_) => "theme",
            Self::Size(_) => "size",
            Self::Distance(_) => "distance",
            Self::Offset(..) => "offset",
            Self::HideOnClick(_) => "hideOnClick",
            Self::HideOnScroll(_) => "hideOnScroll",
            Self::Multiple(_) => "multiple",
            Self::FollowCursor(_) => "followCursor",
            Self::Inertia(_) => "inertia",
            Self::FlipDuration(_) => "flipDuration",
            Self::Sticky(_) => "sticky",
            Self::StickyDuration(_) => "stickyDuration",
            Self::AppendTo(_) => "appendTo",
            Self::ZIndex(_) => "zIndex",
            Self::TouchHold(_) => "touchHold",
            Self::PopperOptions(_) => "popperOptions",
            Self::Open(_) => "open",
            Self::Disabled(_) => "disabled",
            Self::Html(_) => "html",
            Self::UnmountHtmlWhenHide(_) => "unmountHTMLWhenHide",
        }
    }

    /// Whether applying this patch requires rebuilding the popper.
    ///
    /// Only `disabled` and `open` are pure state toggles.
    #[must_use]
    pub const fn redraws(&self) -> bool {
        !matches!(self, Self::Disabled(_) | Self::Open(_))
    }

    /// Parse a patch from a key and a JSON value.
    ///
    /// `null` clears the optional keys (`open`, `hideDuration`, `html`).
    pub fn parse(key: &str, value: serde_json::Value) -> Result<Self, ConfigError> {
        if value.is_null() {
            return match key {
                "open" => Ok(Self::Open(None)),
                "hideDuration" => Ok(Self::HideDuration(None)),
                "html" => Ok(Self::Html(None)),
                _ => Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    value: "null".to_string(),
                }),
            };
        }
        let mut object = serde_json::Map::new();
        object.insert(key.to_string(), value);
        let input: SettingsInput = serde_json::from_value(serde_json::Value::Object(object))?;
        input
            .patches()
            .into_iter()
            .next()
            .ok_or_else(|| ConfigError::InvalidValue {
                key: key.to_string(),
                value: "unset".to_string(),
            })
    }

    /// Write this patch into full settings.
    pub fn apply(self, settings: &mut Settings) {
        match self {
            Self::Position(v) => settings.position = v,
            Self::Animation(v) => settings.animation = v,
            Self::AnimateFill(v) => settings.animate_fill = v,
            Self::Arrow(v) => settings.arrow = v,
            Self::ArrowSize(v) => settings.arrow_size = v,
            Self::Delay(v) => settings.delay = v,
            Self::Trigger(v) => settings.trigger = v,
            Self::Duration(v) => settings.duration = v,
            Self::HideDuration(v) => settings.hide_duration = v,
            Self::Interactive(v) => settings.interactive = v,
            Self::InteractiveBorder(v) => settings.interactive_border = v,
            Self::Theme(v) => settings.theme = v,
            Self::Size(v) => settings.size = v,
            Self::Distance(v) => settings.distance = v,
            Self::Offset(x, y) => settings.offset = (x, y),
            Self::HideOnClick(v) => settings.hide_on_click = v,
            Self::HideOnScroll(v) => settings.hide_on_scroll = v,
            Self::Multiple(v) => settings.multiple = v,
            Self::FollowCursor(v) => settings.follow_cursor = v,
            Self::Inertia(v) => settings.inertia = v,
            Self::FlipDuration(v) => settings.flip_duration = v,
            Self::Sticky(v) => settings.sticky = v,
            Self::StickyDuration(v) => settings.sticky_duration = v,
            Self::AppendTo(v) => settings.append_to = v,
            Self::ZIndex(v) => settings.z_index = v,
            Self::TouchHold(v) => settings.touch_hold = v,
            Self::PopperOptions(v) => settings.popper_options = v,
            Self::Open(v) => settings.open = v,
            Self::Disabled(v) => settings.disabled = v,
            Self::Html(v) => settings.html = v,
            Self::UnmountHtmlWhenHide(v) => settings.unmount_html_when_hide = v,
        }
    }

    fn record(self, input: &mut SettingsInput) {
        match self {
            Self::Position(v) => input.position = Some(v),
            Self::Animation(v) => input.animation = Some(v),
            Self::AnimateFill(v) => input.animate_fill = Some(v),
            Self::Arrow(v) => input.arrow = Some(v),
            Self::ArrowSize(v) => input.arrow_size = Some(v),
            Self::Delay(v) => input.delay = Some(v),
            Self::Trigger(v) => input.trigger = Some(v),
            Self::Duration(v) => input.duration = Some(v),
            Self::HideDuration(v) => input.hide_duration = v,
            Self::Interactive(v) => input.interactive = Some(v),
            Self::InteractiveBorder(v) => input.interactive_border = Some(v),
            Self::Theme(v) => input.theme = Some(v),
            Self::Size(v) => input.size = Some(v),
            Self::Distance(v) => input.distance = Some(v),
            Self::Offset(x, y) => input.offset = Some((x, y)),
            Self::HideOnClick(v) => input.hide_on_click = Some(v),
            Self::HideOnScroll(v) => input.hide_on_scroll = Some(v),
            Self::Multiple(v) => input.multiple = Some(v),
            Self::FollowCursor(v) => input.follow_cursor = Some(v),
            Self::Inertia(v) => input.inertia = Some(v),
            Self::FlipDuration(v) => input.flip_duration = Some(v),
            Self::Sticky(v) => input.sticky = Some(v),
            Self::StickyDuration(v) => input.sticky_duration = Some(v),
            Self::AppendTo(v) => input.append_to = Some(v),
            Self::ZIndex(v) => input.z_index = Some(v),
            Self::TouchHold(v) => input.touch_hold = Some(v),
            Self::PopperOptions(v) => input.popper_options = Some(v),
            Self::Open(v) => input.open = v,
            Self::Disabled(v) => input.disabled = Some(v),
            Self::Html(v) => input.html = v,
            Self::UnmountHtmlWhenHide(v) => input.unmount_html_when_hide = Some(v),
        }
    }
}
