//! Optional overwrite policy.
//!
//! Without it, two tweens animating the same property of the same target both
//! write every tick and the last one wins. With it enabled, a newly added
//! tween takes the property over: matching plugins are removed from the
//! older top-level tweens, and a tween left with nothing to animate is killed.

use serde::{Deserialize, Serialize};

use crate::components::{Animation, Component, Tween};
use crate::core::target::TargetWorld;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OverwriteConfig {
    pub enabled: bool,
    /// Log every property taken over.
    pub verbose: bool,
}

/// Strip the properties `incoming` animates from every live tween in
/// `existing` that shares its target. Returns how many plugins were removed.
pub fn overwrite<'a, W, I>(config: &OverwriteConfig, incoming: &Tween<W>, existing: I) -> usize
where
    W: TargetWorld + 'a,
    I: IntoIterator<Item = &'a mut Component<W>>,
{
    if !config.enabled {
        return 0;
    }
    let properties = incoming.property_names();
    if properties.is_empty() {
        return 0;
    }

    let mut removed = 0;
    for component in existing {
        let Component::Tween(tween) = component else {
            continue;
        };
        if tween.state().is_destroyed() || tween.target() != incoming.target() {
            continue;
        }
        let count = tween.remove_plugins_for(&properties);
        if count > 0 && config.verbose {
            log::warn!(
                "overwrote {} propert{} of a running tween on {:?}{}",
                count,
                if count == 1 { "y" } else { "ies" },
                tween.target(),
                if tween.state().is_destroyed() { " (tween killed)" } else { "" }
            );
        }
        removed += count;
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use crate::api::config::TweenConfig;
    use crate::core::target::Property;
    use crate::plugins::ValuePlugin;

    #[derive(Debug, Default)]
    struct Knob {
        a: f32,
        b: f32,
    }

    type World = HashMap<u32, Knob>;

    fn a() -> Property<Knob, f32> {
        Property::new("a", |k: &Knob| k.a, |k, v| k.a = v)
    }

    fn b() -> Property<Knob, f32> {
        Property::new("b", |k: &Knob| k.b, |k, v| k.b = v)
    }

    fn tween(key: u32) -> Tween<World> {
        Tween::new(key, 1.0, TweenConfig::new()).unwrap()
    }

    const ON: OverwriteConfig = OverwriteConfig { enabled: true, verbose: true };

    #[test]
    fn disabled_policy_leaves_tweens_alone() {
        let incoming = tween(1).with_plugin(ValuePlugin::new(a(), 1.0).unwrap());
        let mut existing: Vec<Component<World>> =
            vec![tween(1).with_plugin(ValuePlugin::new(a(), 5.0).unwrap()).into()];
        assert_eq!(overwrite(&OverwriteConfig::default(), &incoming, existing.iter_mut()), 0);
        assert_eq!(existing[0].plugins().len(), 1);
    }

    #[test]
    fn matching_properties_are_taken_over() {
        let incoming = tween(1).with_plugin(ValuePlugin::new(a(), 1.0).unwrap());
        let mut existing: Vec<Component<World>> = vec![
            tween(1)
                .with_plugin(ValuePlugin::new(a(), 5.0).unwrap())
                .with_plugin(ValuePlugin::new(b(), 5.0).unwrap())
                .into(),
            tween(1).with_plugin(ValuePlugin::new(a(), 2.0).unwrap()).into(),
            tween(2).with_plugin(ValuePlugin::new(a(), 2.0).unwrap()).into(),
        ];

        assert_eq!(overwrite(&ON, &incoming, existing.iter_mut()), 2);
        assert_eq!(existing[0].plugins()[0].property(), "b");
        assert!(!existing[0].state().is_destroyed());
        assert!(existing[1].state().is_destroyed());
        assert_eq!(existing[2].plugins().len(), 1);
    }
}
