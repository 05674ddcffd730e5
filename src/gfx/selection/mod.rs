//! # Selection and Highlight Reconciler
//!
//! Runs on every pointer move and once per frame. Each run rebuilds the
//! highlighted set from scratch out of the latest [`PickResult`] instead of
//! diffing, so an object that stops being under the pointer can never stay
//! highlighted. The reconciler is the only writer of the [`SelectionState`]
//! that feeds the outline pass.

use std::collections::BTreeMap;

use log::{debug, trace};

use crate::gfx::animation::{AvatarAnimator, JukeboxController};
use crate::gfx::context::{ActionId, SceneContext};
use crate::gfx::picking::{PickHit, PickResult};
use crate::gfx::scene::{Category, ContactKind, InteractiveObjectRegistry, ObjectId, ProxyHandle};

/// Cursor shown over the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorAffordance {
    #[default]
    Default,
    Pointer,
}

/// One highlighted object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selected {
    pub id: ObjectId,
    pub proxy: ProxyHandle,
}

impl From<&PickHit> for Selected {
    fn from(hit: &PickHit) -> Self {
        Self {
            id: hit.id.clone(),
            proxy: hit.proxy,
        }
    }
}

/// Currently highlighted objects, at most one per category
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionState {
    hovered: BTreeMap<Category, Selected>,
    /// Frame held open by a click; blocks hover highlights on other frames
    pinned_frame: Option<Selected>,
}

impl SelectionState {
    /// Highlighted object of `category`; a pinned frame wins over hover
    pub fn highlighted(&self, category: Category) -> Option<&Selected> {
        if category == Category::Frame {
            if let Some(pinned) = &self.pinned_frame {
                return Some(pinned);
            }
        }
        self.hovered.get(&category)
    }

    pub fn is_highlighted(&self, id: &ObjectId) -> bool {
        self.pinned_frame.as_ref().is_some_and(|pinned| pinned.id == *id)
            || self.hovered.values().any(|selected| selected.id == *id)
    }

    pub fn pinned_frame(&self) -> Option<&Selected> {
        self.pinned_frame.as_ref()
    }

    /// Proxies for the outline pass
    pub fn proxies(&self) -> Vec<ProxyHandle> {
        let mut proxies: Vec<ProxyHandle> = self.pinned_frame.iter().map(|s| s.proxy).collect();
        proxies.extend(self.hovered.values().map(|selected| selected.proxy));
        proxies
    }

    pub fn is_empty(&self) -> bool {
        self.hovered.is_empty() && self.pinned_frame.is_none()
    }
}

const HIGHLIGHT_CHANNELS: [Category; 7] = [
    Category::Card,
    Category::Frame,
    Category::Avatar,
    Category::Jukebox,
    Category::Phone,
    Category::ContactLink,
    Category::SecurityCamera,
];

pub struct SelectionReconciler {
    selection: SelectionState,
    cursor: CursorAffordance,
    contact_selected: bool,
    armed_contact: Option<ContactKind>,
    avatar_hovered: bool,
    hover_action: ActionId,
}

impl SelectionReconciler {
    /// `hover_action` is what the avatar plays when the pointer reaches it
    pub fn new(hover_action: ActionId) -> Self {
        Self {
            selection: SelectionState::default(),
            cursor: CursorAffordance::Default,
            contact_selected: false,
            armed_contact: None,
            avatar_hovered: false,
            hover_action,
        }
    }

    /// Bring highlights, cursor, avatar, jukebox and contact arming in line
    /// with `pick`
    pub fn reconcile(
        &mut self,
        pick: &PickResult,
        registry: &InteractiveObjectRegistry,
        now_ms: f64,
        avatar: &mut AvatarAnimator,
        jukebox: &mut JukeboxController,
        ctx: &mut SceneContext,
    ) {
        let before = self.selection.proxies();

        // A pinned frame that left the registry cannot stay highlighted
        if let Some(pinned) = &self.selection.pinned_frame {
            if !registry.contains(&pinned.id) {
                debug!("Pinned frame '{}' is gone", pinned.id);
                self.selection.pinned_frame = None;
            }
        }

        // Full reset, then set the nearest hit of every channel
        self.selection.hovered.clear();
        for category in HIGHLIGHT_CHANNELS {
            if category == Category::Frame && self.selection.pinned_frame.is_some() {
                continue;
            }
            if let Some(hit) = pick.nearest(category) {
                self.selection.hovered.insert(category, Selected::from(hit));
            }
        }

        let avatar_hit = pick.contains(Category::Avatar);
        if avatar_hit && !self.avatar_hovered {
            avatar.swap(&self.hover_action, now_ms, ctx.avatar_mixer.as_mut());
        }
        self.avatar_hovered = avatar_hit;

        jukebox.apply_hover(
            pick.contains(Category::Jukebox),
            ctx.jukebox_mixer.as_mut(),
            ctx.audio.as_mut(),
        );

        self.contact_selected =
            pick.contains(Category::Phone) || pick.contains(Category::ContactLink);
        self.armed_contact = pick
            .nearest(Category::ContactLink)
            .and_then(|hit| registry.lookup(&hit.id).ok())
            .and_then(|object| object.contact());

        let pointer = pick.contains(Category::Frame)
            || pick.contains(Category::Card)
            || pick.contains(Category::SecurityCamera)
            || self.armed_contact.is_some();
        self.cursor = if pointer {
            CursorAffordance::Pointer
        } else {
            CursorAffordance::Default
        };

        let after = self.selection.proxies();
        if after != before {
            trace!("Outline selection now {:?}", after);
            ctx.post_process.set_outline_selection(&after);
        }
    }

    /// Hold a clicked frame highlighted until [`Self::unpin_frame`]
    pub fn pin_frame(&mut self, hit: &PickHit, ctx: &mut SceneContext) {
        debug!("Pinned frame '{}'", hit.id);
        self.selection.pinned_frame = Some(Selected::from(hit));
        self.selection.hovered.remove(&Category::Frame);
        ctx.post_process
            .set_outline_selection(&self.selection.proxies());
    }

    pub fn unpin_frame(&mut self, ctx: &mut SceneContext) {
        if let Some(pinned) = self.selection.pinned_frame.take() {
            debug!("Unpinned frame '{}'", pinned.id);
            ctx.post_process
                .set_outline_selection(&self.selection.proxies());
        }
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn cursor(&self) -> CursorAffordance {
        self.cursor
    }

    /// Whether the phone or one of its contact parts is under the pointer
    pub fn contact_selected(&self) -> bool {
        self.contact_selected
    }

    pub fn armed_contact(&self) -> Option<ContactKind> {
        self.armed_contact
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::animation::AvatarConfig;
    use crate::gfx::context::AudioSource;
    use crate::gfx::headless::{
        HeadlessAudio, HeadlessLightRig, HeadlessMixer, HeadlessPostProcess, ManualClock,
    };
    use crate::gfx::picking::BoundsIntersector;
    use crate::gfx::scene::Payload;

    struct Rig {
        ctx: SceneContext,
        avatar_mixer: HeadlessMixer,
        audio: HeadlessAudio,
        post: HeadlessPostProcess,
        avatar: AvatarAnimator,
        jukebox: JukeboxController,
        registry: InteractiveObjectRegistry,
        reconciler: SelectionReconciler,
    }

    impl Rig {
        fn new() -> Self {
            let avatar_mixer = HeadlessMixer::new();
            let jukebox_mixer = HeadlessMixer::new();
            let audio = HeadlessAudio::new();
            let post = HeadlessPostProcess::new();
            let mut ctx = SceneContext {
                intersector: Box::new(BoundsIntersector::new()),
                clock: Box::new(ManualClock::new(0.0)),
                avatar_mixer: Box::new(avatar_mixer.clone()),
                jukebox_mixer: Box::new(jukebox_mixer),
                audio: Box::new(audio.clone()),
                post_process: Box::new(post.clone()),
                lights: Box::new(HeadlessLightRig::new()),
            };
            let avatar = AvatarAnimator::new(&AvatarConfig::default(), ctx.avatar_mixer.as_mut());
            let jukebox = JukeboxController::new(ActionId::SPIN, ctx.jukebox_mixer.as_mut());

            let mut registry = InteractiveObjectRegistry::new();
            for (id, category, proxy) in [
                ("F1", Category::Frame, 1),
                ("F2", Category::Frame, 2),
                ("avatar", Category::Avatar, 3),
                ("jukebox", Category::Jukebox, 4),
                ("phone", Category::Phone, 5),
            ] {
                registry
                    .register(id, category, ProxyHandle(proxy), Payload::None)
                    .unwrap();
            }
            registry
                .register(
                    "phone-github",
                    Category::ContactLink,
                    ProxyHandle(6),
                    Payload::Contact(ContactKind::Github),
                )
                .unwrap();

            Self {
                ctx,
                avatar_mixer,
                audio,
                post,
                avatar,
                jukebox,
                registry,
                reconciler: SelectionReconciler::new(ActionId::WAVE),
            }
        }

        fn hit(&self, id: &str, distance: f32) -> PickHit {
            let object = self.registry.lookup(&ObjectId::new(id)).unwrap();
            PickHit {
                id: object.id.clone(),
                category: object.category(),
                proxy: object.proxy,
                distance,
            }
        }

        fn reconcile(&mut self, hits: Vec<PickHit>, now_ms: f64) {
            let pick = PickResult::from_hits(hits);
            self.reconciler.reconcile(
                &pick,
                &self.registry,
                now_ms,
                &mut self.avatar,
                &mut self.jukebox,
                &mut self.ctx,
            );
        }
    }

    #[test]
    fn test_frame_highlight_follows_pointer() {
        let mut rig = Rig::new();
        rig.reconcile(vec![rig.hit("F1", 5.0)], 0.0);
        assert_eq!(
            rig.reconciler.selection().highlighted(Category::Frame).unwrap().id.as_str(),
            "F1"
        );
        assert_eq!(rig.reconciler.cursor(), CursorAffordance::Pointer);
        assert_eq!(rig.post.selection(), vec![ProxyHandle(1)]);

        rig.reconcile(vec![], 16.0);
        assert!(rig.reconciler.selection().is_empty());
        assert_eq!(rig.reconciler.cursor(), CursorAffordance::Default);
        assert!(rig.post.selection().is_empty());
    }

    #[test]
    fn test_only_nearest_frame_is_highlighted() {
        let mut rig = Rig::new();
        rig.reconcile(vec![rig.hit("F2", 7.0), rig.hit("F1", 3.0)], 0.0);

        let selection = rig.reconciler.selection();
        assert!(selection.is_highlighted(&"F1".into()));
        assert!(!selection.is_highlighted(&"F2".into()));
    }

    #[test]
    fn test_independent_channels_co_highlight() {
        let mut rig = Rig::new();
        rig.reconcile(
            vec![rig.hit("F1", 3.0), rig.hit("avatar", 4.0), rig.hit("jukebox", 6.0)],
            0.0,
        );
        assert_eq!(rig.reconciler.selection().proxies().len(), 3);
    }

    #[test]
    fn test_avatar_waves_once_per_hover() {
        let mut rig = Rig::new();
        rig.reconcile(vec![rig.hit("avatar", 2.0)], 0.0);
        rig.reconcile(vec![rig.hit("avatar", 2.0)], 16.0);
        rig.reconcile(vec![rig.hit("avatar", 2.0)], 32.0);

        assert_eq!(rig.avatar.current(), &ActionId::WAVE);
        assert_eq!(rig.avatar_mixer.crossfades().len(), 1);
    }

    #[test]
    fn test_jukebox_hover_then_pin() {
        let mut rig = Rig::new();
        rig.reconcile(vec![rig.hit("jukebox", 2.0)], 0.0);
        assert!(rig.audio.is_playing());
        assert!(rig.jukebox.is_spinning());

        rig.reconcile(vec![], 16.0);
        assert!(!rig.audio.is_playing());
        assert!(!rig.jukebox.is_spinning());

        rig.reconcile(vec![rig.hit("jukebox", 2.0)], 32.0);
        rig.jukebox
            .toggle_pin(rig.ctx.jukebox_mixer.as_mut(), rig.ctx.audio.as_mut());
        rig.reconcile(vec![], 48.0);
        assert!(rig.audio.is_playing());
        assert!(rig.jukebox.is_spinning());
    }

    #[test]
    fn test_contact_arming() {
        let mut rig = Rig::new();
        rig.reconcile(vec![rig.hit("phone", 2.0)], 0.0);
        assert!(rig.reconciler.contact_selected());
        assert_eq!(rig.reconciler.armed_contact(), None);
        assert_eq!(rig.reconciler.cursor(), CursorAffordance::Default);

        rig.reconcile(vec![rig.hit("phone", 2.0), rig.hit("phone-github", 1.9)], 16.0);
        assert_eq!(rig.reconciler.armed_contact(), Some(ContactKind::Github));
        assert_eq!(rig.reconciler.cursor(), CursorAffordance::Pointer);

        rig.reconcile(vec![], 32.0);
        assert!(!rig.reconciler.contact_selected());
        assert_eq!(rig.reconciler.armed_contact(), None);
    }

    #[test]
    fn test_pinned_frame_blocks_other_frames() {
        let mut rig = Rig::new();
        let f1 = rig.hit("F1", 3.0);
        rig.reconciler.pin_frame(&f1, &mut rig.ctx);

        rig.reconcile(vec![rig.hit("F2", 2.0)], 0.0);
        let selection = rig.reconciler.selection();
        assert_eq!(selection.highlighted(Category::Frame).unwrap().id.as_str(), "F1");
        assert!(!selection.is_highlighted(&"F2".into()));

        rig.reconciler.unpin_frame(&mut rig.ctx);
        rig.reconcile(vec![rig.hit("F2", 2.0)], 16.0);
        assert_eq!(
            rig.reconciler.selection().highlighted(Category::Frame).unwrap().id.as_str(),
            "F2"
        );
    }

    #[test]
    fn test_pinned_frame_dropped_when_unregistered() {
        let mut rig = Rig::new();
        let f1 = rig.hit("F1", 3.0);
        rig.reconciler.pin_frame(&f1, &mut rig.ctx);
        rig.registry.unregister(&"F1".into());

        rig.reconcile(vec![], 0.0);
        assert!(rig.reconciler.selection().is_empty());
    }
}
