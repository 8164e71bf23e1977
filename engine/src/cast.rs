use indexmap::IndexMap;

use crate::ability::{AbilityDefinition, Element, Tier};
use crate::battle::{Battle, Hook};
use crate::effects::{attach_effect, Effect, EffectKind, EffectOrigin};
use crate::error::CastError;
use crate::message::{format_number, MessageFormatter, TemplateData};
use crate::roster::{ActorId, Roster};
use crate::targeting::{Targeting, TargetingRegistry};

/// Everything one invocation needs besides the spell itself.
#[derive(Debug, Clone, Default)]
pub struct CastRequest {
    pub damage: f64,
    pub targets: Vec<ActorId>,
    pub message: Option<String>,
    pub effect: Option<EffectKind>,
    pub effect_duration: Option<i64>,
    pub effect_potency: Option<i64>,
    pub effect_name: Option<String>,
    pub effect_extra: IndexMap<String, serde_json::Value>,
    pub template_data: TemplateData,
}

impl CastRequest {
    pub fn new(damage: f64, targets: Vec<ActorId>) -> Self {
        Self {
            damage,
            targets,
            ..Self::default()
        }
    }

    pub fn message(mut self, template: impl Into<String>) -> Self {
        self.message = Some(template.into());
        self
    }

    pub fn effect(mut self, kind: EffectKind) -> Self {
        self.effect = Some(kind);
        self
    }

    pub fn effect_duration(mut self, duration: i64) -> Self {
        self.effect_duration = Some(duration);
        self
    }

    pub fn effect_potency(mut self, potency: i64) -> Self {
        self.effect_potency = Some(potency);
        self
    }

    pub fn effect_name(mut self, name: impl Into<String>) -> Self {
        self.effect_name = Some(name.into());
        self
    }

    pub fn data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.template_data.insert(key.into(), value.into());
        self
    }
}

/// An ability bound to a caster with its tier already resolved.
///
/// The tier is fixed at `prepare` time and does not change for the
/// lifetime of the spell, even if the caster's stats do.
#[derive(Debug, Clone, Copy)]
pub struct Spell<'a> {
    definition: &'a AbilityDefinition,
    tier: &'a Tier,
    caster: ActorId,
}

impl<'a> Spell<'a> {
    /// Resolve the caster's tier. Casting requires a tier, so this is the
    /// guard callers run before `cast`.
    pub fn prepare(
        definition: &'a AbilityDefinition,
        roster: &Roster,
        caster: ActorId,
    ) -> Result<Self, CastError> {
        let subject = roster.subject(caster).ok_or(CastError::UnknownActor(caster))?;
        let actor = subject.actor;
        let tier = definition
            .resolve_tier(subject)
            .ok_or_else(|| CastError::NoTier {
                ability: definition.name.clone(),
                actor: actor.name.clone(),
            })?;
        tracing::debug!(
            caster = %actor.name,
            ability = %definition.name,
            tier = %tier.name,
            "tier resolved"
        );
        Ok(Self {
            definition,
            tier,
            caster,
        })
    }

    pub fn definition(&self) -> &'a AbilityDefinition {
        self.definition
    }

    pub fn tier(&self) -> &'a Tier {
        self.tier
    }

    pub fn caster(&self) -> ActorId {
        self.caster
    }

    pub fn element(&self) -> Element {
        self.definition.element
    }

    pub fn cost(&self) -> i64 {
        self.tier.cost
    }

    pub fn power(&self) -> i64 {
        self.tier.power
    }

    pub fn targeting<'r>(&self, registry: &'r TargetingRegistry) -> Targeting<'r> {
        registry.view(self.caster)
    }

    /// Run one invocation against `request.targets`, in order.
    ///
    /// Cost is charged once up front whether or not anything is hit. A
    /// target that drops from alive to exactly 0 HP is reported dead once;
    /// effects only land on targets still standing after the hit.
    pub fn cast(
        &self,
        roster: &mut Roster,
        battle: &mut impl Battle,
        formatter: &impl MessageFormatter,
        request: CastRequest,
    ) {
        let element = self.element();
        battle.try_increment_stat(roster, self.caster, &format!("Combat.Utilize.{}", element));

        let damage = request.damage.round() as i64;

        if let Some(caster) = roster.get_mut(self.caster) {
            caster
                .pool_mut(self.definition.stat)
                .apply(self.definition.oper, self.tier.cost);
        }

        let mut data = request.template_data.clone();
        data.insert("spellName".to_string(), self.tier.name.clone());

        let message = request.message.as_deref().filter(|m| !m.is_empty());

        if request.targets.is_empty() {
            if let (Some(message), Some(caster)) = (message, roster.get(self.caster)) {
                battle.emit_narration(formatter.format(message, caster, &data));
            }
            return;
        }

        for &target in &request.targets {
            let Some(target_actor) = roster.get(target) else {
                tracing::warn!(?target, "cast target missing from roster");
                continue;
            };
            data.insert("targetName".to_string(), target_actor.name.clone());

            battle.emit_events(roster, self.caster, Hook::Attack);
            battle.emit_events(roster, target, Hook::Attacked);

            let was_alive = roster.get(target).is_some_and(|t| t.is_alive());
            let dealt = if damage != 0 {
                battle.apply_damage(roster, target, damage, self.caster)
            } else {
                0
            };

            data.insert("damage".to_string(), format_number(dealt));
            data.insert("healed".to_string(), format_number(dealt.abs()));

            if let (Some(message), Some(caster)) = (message, roster.get(self.caster)) {
                battle.emit_narration(formatter.format(message, caster, &data));
            }

            let hp_now = roster.get(target).map_or(0, |t| t.hp.current);
            if was_alive && hp_now == 0 {
                battle.handle_death(roster, target, self.caster);
            }

            if let Some(kind) = &request.effect {
                if hp_now > 0 {
                    self.give_effect(roster, battle, target, kind, &request);
                }
            }
        }
    }

    fn give_effect(
        &self,
        roster: &mut Roster,
        battle: &mut impl Battle,
        target: ActorId,
        kind: &EffectKind,
        request: &CastRequest,
    ) {
        let Some(caster_name) = roster.get(self.caster).map(|c| c.name.clone()) else {
            return;
        };
        let potency = request
            .effect_potency
            .unwrap_or_else(|| self.definition.calc_potency());
        let duration = request
            .effect_duration
            .unwrap_or_else(|| self.definition.calc_duration());

        let mut effect =
            Effect::new(kind.clone(), potency, duration).with_extra(request.effect_extra.clone());
        effect.origin = Some(EffectOrigin {
            name: caster_name,
            caster: self.caster,
            ability: request
                .effect_name
                .clone()
                .unwrap_or_else(|| self.tier.name.clone()),
        });

        if let Some(target) = roster.get_mut(target) {
            attach_effect(target, effect);
        }

        let element = self.element();
        battle.try_increment_stat(roster, self.caster, &format!("Combat.Give.Effect.{}", element));
        battle.try_increment_stat(roster, target, &format!("Combat.Receive.Effect.{}", element));
    }

    /// Apply named combat effects (`prone`, `poison`, ...) to `target`
    /// without dealing damage. Potency grows with the caster's live stat of
    /// the same name; `prone` always lasts a single tick.
    pub fn apply_combat_effects(
        &self,
        roster: &mut Roster,
        battle: &mut impl Battle,
        formatter: &impl MessageFormatter,
        effects: &[&str],
        target: ActorId,
    ) {
        for &name in effects {
            let Some(kind) = EffectKind::from_name(name) else {
                tracing::warn!(effect = name, "unknown combat effect");
                continue;
            };
            let bonus = roster
                .get(self.caster)
                .map_or(0, |c| c.live_stat(name))
                .max(0);
            let duration = if name == "prone" {
                1
            } else {
                self.definition.calc_duration()
            };

            let request = CastRequest::new(0.0, vec![target])
                .effect(kind)
                .effect_name(name)
                .effect_potency(1 + bonus)
                .effect_duration(duration);
            self.cast(roster, battle, formatter, request);
        }
    }
}
