//! End-to-end tests of the ability-use workflow against the in-memory
//! gateway and scripted providers.

mod common;

use common::{RecordingPlacer, ScriptedChoices, StubEvaluator, hero, init_tracing, longsword, spell};
use rules_core::consume::ConsumeError;
use rules_core::{
    ActionType, ConsumeKind, ConsumeProfile, ConsumeTarget, DamagePart, DamageType, FeatureData,
    Item, ItemId, ItemKind, LimitedUses, Recharge, SaveProfile, SaveScaling, SaveType,
    ScalingMode, TargetProfile, TargetType, UsePeriod,
};
use runtime::{
    AbortReason, MemoryGateway, UsageChoice, UsageOptions, UsageOutcome, UsageWorkflow,
};

fn use_choice(consume: bool, place_area: bool) -> UsageChoice {
    UsageChoice {
        consume,
        place_area,
    }
}

#[tokio::test]
async fn weapon_attack_rolls_attack_and_damage_without_a_dialog() {
    init_tracing();
    let mut actor = hero();
    let sword = longsword(ItemId(1));
    actor.inventory.push(sword.clone());

    let gateway = MemoryGateway::new(actor.clone());
    let choices = ScriptedChoices::answering(use_choice(true, false));
    let placer = RecordingPlacer::default();
    let evaluator = StubEvaluator::new(4);
    let workflow = UsageWorkflow::new(&choices, &gateway, &placer, &evaluator);

    let outcome = workflow
        .run(&sword, &actor, UsageOptions::default())
        .await
        .unwrap();

    let report = outcome.report().expect("usage should complete");
    // No recharge, no charges, no area: the dialog is never shown.
    assert_eq!(choices.times_asked(), 0);

    // d20 (stubbed to 4) + str 3 + prof 2.
    let attack = report.attack.as_ref().unwrap();
    assert_eq!(attack.formula, "1d20 + @mod + @prof");
    assert_eq!(attack.total, 4 + 3 + 2);

    // 1d8 stubbed to 4.
    let damage = report.damage.as_ref().unwrap();
    assert_eq!(damage.total, 4);
    assert!(report.consumed.is_empty());
}

#[tokio::test]
async fn attack_modifier_sum_is_constant_across_die_outcomes() {
    let mut actor = hero();
    let sword = longsword(ItemId(1));
    actor.inventory.push(sword.clone());

    for die_value in [1, 7, 20] {
        let gateway = MemoryGateway::new(actor.clone());
        let choices = ScriptedChoices::answering(use_choice(true, false));
        let placer = RecordingPlacer::default();
        let evaluator = StubEvaluator::new(die_value);
        let workflow = UsageWorkflow::new(&choices, &gateway, &placer, &evaluator);

        let outcome = workflow
            .run(&sword, &actor, UsageOptions::default())
            .await
            .unwrap();
        let attack = outcome.report().unwrap().attack.clone().unwrap();

        let d20 = i64::from(die_value.min(20));
        assert_eq!(attack.total - d20, 5, "static modifiers must sum to +5");
    }
}

#[tokio::test]
async fn ammunition_is_consumed_on_attack_and_rides_the_damage_roll() {
    let mut actor = hero();
    let arrows_id = ItemId(2);
    let mut arrows = Item::new(
        arrows_id,
        "Arrows",
        ItemKind::Consumable(Default::default()),
    );
    arrows.usage.quantity = 12;
    arrows.usage.damage = vec![DamagePart::new("1d4", DamageType::Piercing)];
    actor.inventory.push(arrows);

    let mut bow = longsword(ItemId(1));
    bow.name = "Longbow".to_string();
    bow.usage.action_type = ActionType::RangedWeaponAttack;
    bow.usage.consume = Some(ConsumeProfile::new(
        ConsumeKind::Ammunition,
        ConsumeTarget::Item(arrows_id),
        1,
    ));
    actor.inventory.push(bow.clone());

    let gateway = MemoryGateway::new(actor.clone());
    let choices = ScriptedChoices::answering(use_choice(true, false));
    let placer = RecordingPlacer::default();
    let evaluator = StubEvaluator::new(3);
    let workflow = UsageWorkflow::new(&choices, &gateway, &placer, &evaluator);

    let outcome = workflow
        .run(&bow, &actor, UsageOptions::default())
        .await
        .unwrap();
    let report = outcome.report().unwrap();

    // Arrow stack persisted at 11.
    let after = gateway.actor().await;
    assert_eq!(after.item(arrows_id).unwrap().usage.quantity, 11);

    let ammo = report
        .consumed
        .iter()
        .find(|entry| entry.kind == ConsumeKind::Ammunition)
        .unwrap();
    assert_eq!((ammo.amount, ammo.remaining), (1, 11));

    // Damage ends with the ammunition term and is flavored with its name.
    let damage = report.damage.as_ref().unwrap();
    assert_eq!(damage.formula, "1d8 + @ammo");
    assert_eq!(damage.total, 3 + 3);
    assert!(damage.flavor.ends_with("[Arrows]"));
}

#[tokio::test]
async fn augmented_spell_pays_the_chosen_cost_and_scales_damage() {
    let mut actor = hero();
    let mut bolt = spell(ItemId(1), "Fire Bolt", 2);
    bolt.usage.action_type = ActionType::RangedSpellAttack;
    bolt.usage.damage = vec![DamagePart::new("2d8", DamageType::Fire)];
    if let ItemKind::Superpower(data) = &mut bolt.kind {
        data.scaling.mode = ScalingMode::Augment;
        data.scaling.formula = Some("1d8".to_string());
    }
    actor.inventory.push(bolt.clone());

    let gateway = MemoryGateway::new(actor.clone());
    let choices = ScriptedChoices::answering(use_choice(true, false));
    let placer = RecordingPlacer::default();
    let evaluator = StubEvaluator::new(5);
    let workflow = UsageWorkflow::new(&choices, &gateway, &placer, &evaluator);

    let options = UsageOptions {
        spent_cost: Some(4),
        ..Default::default()
    };
    let outcome = workflow.run(&bolt, &actor, options).await.unwrap();
    let report = outcome.report().unwrap();

    // Paid 4 mana out of 10.
    assert_eq!(gateway.actor().await.pools.mana.value, 6);
    let paid = &report.consumed[0];
    assert_eq!((paid.kind, paid.amount, paid.remaining), (ConsumeKind::Attribute, 4, 6));

    // Two extra spend points: 2d8 + 2d8, every die stubbed to 5.
    let damage = report.damage.as_ref().unwrap();
    assert_eq!(damage.formula, "2d8 + 2d8");
    assert_eq!(damage.total, 20);
}

#[tokio::test]
async fn cantrip_damage_scales_with_level_and_merges_dice() {
    let mut actor = hero();
    actor.level = 9;
    let mut jolt = spell(ItemId(1), "Jolt", 0);
    jolt.usage.action_type = ActionType::RangedSpellAttack;
    jolt.usage.damage = vec![DamagePart::new("3d6", DamageType::Lightning)];
    if let ItemKind::Superpower(data) = &mut jolt.kind {
        data.scaling.mode = ScalingMode::Tiered;
        data.scaling.formula = Some("1d6".to_string());
    }
    actor.inventory.push(jolt.clone());

    let gateway = MemoryGateway::new(actor.clone());
    let choices = ScriptedChoices::answering(use_choice(true, false));
    let placer = RecordingPlacer::default();
    let evaluator = StubEvaluator::new(2);
    let workflow = UsageWorkflow::new(&choices, &gateway, &placer, &evaluator);

    let outcome = workflow
        .run(&jolt, &actor, UsageOptions::default())
        .await
        .unwrap();
    let report = outcome.report().unwrap();

    let damage = report.damage.as_ref().unwrap();
    assert_eq!(damage.formula, "4d6");
    assert_eq!(damage.total, 8);

    // Cantrips cost nothing; the mana pool is untouched.
    assert_eq!(gateway.actor().await.pools.mana.value, 10);
    assert!(report.consumed.is_empty());
}

#[tokio::test]
async fn cancelling_the_dialog_aborts_without_mutation() {
    let mut actor = hero();
    let mut breath = Item::new(
        ItemId(1),
        "Breath Weapon",
        ItemKind::Feature(FeatureData::default()),
    );
    breath.usage.recharge = Some(Recharge::new(5));
    actor.inventory.push(breath.clone());

    let gateway = MemoryGateway::new(actor.clone());
    let choices = ScriptedChoices::cancelling();
    let placer = RecordingPlacer::default();
    let evaluator = StubEvaluator::new(3);
    let workflow = UsageWorkflow::new(&choices, &gateway, &placer, &evaluator);

    let outcome = workflow
        .run(&breath, &actor, UsageOptions::default())
        .await
        .unwrap();

    assert_eq!(outcome, UsageOutcome::Aborted(AbortReason::Cancelled));
    assert_eq!(choices.times_asked(), 1);
    // Recharge flag untouched.
    let after = gateway.actor().await;
    assert!(after.item(ItemId(1)).unwrap().usage.recharge.unwrap().charged);
}

#[tokio::test]
async fn resource_shortfall_aborts_but_keeps_the_recharge_commit() {
    let mut actor = hero();
    actor.pools.mana.value = 3;

    let mut siphon = Item::new(
        ItemId(1),
        "Mana Siphon",
        ItemKind::Feature(FeatureData::default()),
    );
    siphon.usage.recharge = Some(Recharge::new(4));
    siphon.usage.consume = Some(ConsumeProfile::new(
        ConsumeKind::Attribute,
        ConsumeTarget::Attribute(rules_core::AttributeRef::Mana),
        5,
    ));
    actor.inventory.push(siphon.clone());

    let gateway = MemoryGateway::new(actor.clone());
    let choices = ScriptedChoices::answering(use_choice(true, false));
    let placer = RecordingPlacer::default();
    let evaluator = StubEvaluator::new(3);
    let workflow = UsageWorkflow::new(&choices, &gateway, &placer, &evaluator);

    let outcome = workflow
        .run(&siphon, &actor, UsageOptions::default())
        .await
        .unwrap();

    match outcome {
        UsageOutcome::Aborted(AbortReason::Consume(ConsumeError::InsufficientResource {
            available,
            amount,
            ..
        })) => {
            assert_eq!((available, amount), (3, 5));
        }
        other => panic!("expected an insufficient-resource abort, got {other:?}"),
    }

    let after = gateway.actor().await;
    // The recharge decrement committed before consumption failed and is
    // deliberately not rolled back.
    assert!(!after.item(ItemId(1)).unwrap().usage.recharge.unwrap().charged);
    // The pool itself was never touched.
    assert_eq!(after.pools.mana.value, 3);
}

#[tokio::test]
async fn feature_charges_decrement_only_when_consume_is_chosen() {
    let mut actor = hero();
    let mut stand = Item::new(
        ItemId(1),
        "Second Wind",
        ItemKind::Feature(FeatureData::default()),
    );
    stand.usage.uses = Some(LimitedUses {
        value: 3,
        max: 3,
        per: Some(UsePeriod::ShortRest),
        auto_destroy: false,
    });
    actor.inventory.push(stand.clone());

    // Player keeps the charge.
    let gateway = MemoryGateway::new(actor.clone());
    let choices = ScriptedChoices::answering(use_choice(false, false));
    let placer = RecordingPlacer::default();
    let evaluator = StubEvaluator::new(3);
    let workflow = UsageWorkflow::new(&choices, &gateway, &placer, &evaluator);
    workflow
        .run(&stand, &actor, UsageOptions::default())
        .await
        .unwrap();
    assert_eq!(
        gateway.actor().await.item(ItemId(1)).unwrap().usage.uses.as_ref().unwrap().value,
        3
    );

    // Player spends the charge.
    let gateway = MemoryGateway::new(actor.clone());
    let choices = ScriptedChoices::answering(use_choice(true, false));
    let workflow = UsageWorkflow::new(&choices, &gateway, &placer, &evaluator);
    workflow
        .run(&stand, &actor, UsageOptions::default())
        .await
        .unwrap();
    assert_eq!(
        gateway.actor().await.item(ItemId(1)).unwrap().usage.uses.as_ref().unwrap().value,
        2
    );
}

#[tokio::test]
async fn consumable_stack_rolls_over_and_resets_its_counter() {
    let mut actor = hero();
    let mut potion = Item::new(
        ItemId(1),
        "Healing Draught",
        ItemKind::Consumable(Default::default()),
    );
    potion.usage.quantity = 2;
    potion.usage.uses = Some(LimitedUses {
        value: 1,
        max: 3,
        per: Some(UsePeriod::Charges),
        auto_destroy: false,
    });
    actor.inventory.push(potion.clone());

    let gateway = MemoryGateway::new(actor.clone());
    let choices = ScriptedChoices::answering(use_choice(true, false));
    let placer = RecordingPlacer::default();
    let evaluator = StubEvaluator::new(3);
    let workflow = UsageWorkflow::new(&choices, &gateway, &placer, &evaluator);

    workflow
        .run(&potion, &actor, UsageOptions::default())
        .await
        .unwrap();

    let after = gateway.actor().await;
    let stored = after.item(ItemId(1)).unwrap();
    // Last charge of this stack spent: quantity drops, counter refills.
    assert_eq!(stored.usage.quantity, 1);
    assert_eq!(stored.usage.uses.as_ref().unwrap().value, 3);
}

#[tokio::test]
async fn consumable_auto_destroys_on_its_last_use() {
    let mut actor = hero();
    let mut bomb = Item::new(
        ItemId(1),
        "Alchemist's Fire",
        ItemKind::Consumable(Default::default()),
    );
    bomb.usage.quantity = 1;
    bomb.usage.uses = Some(LimitedUses {
        value: 1,
        max: 1,
        per: Some(UsePeriod::Charges),
        auto_destroy: true,
    });
    actor.inventory.push(bomb.clone());

    let gateway = MemoryGateway::new(actor.clone());
    let choices = ScriptedChoices::answering(use_choice(true, false));
    let placer = RecordingPlacer::default();
    let evaluator = StubEvaluator::new(3);
    let workflow = UsageWorkflow::new(&choices, &gateway, &placer, &evaluator);

    workflow
        .run(&bomb, &actor, UsageOptions::default())
        .await
        .unwrap();

    assert!(gateway.actor().await.item(ItemId(1)).is_none());
}

#[tokio::test]
async fn depleted_consumable_aborts_with_a_warning() {
    let mut actor = hero();
    let mut empty = Item::new(
        ItemId(1),
        "Empty Vial",
        ItemKind::Consumable(Default::default()),
    );
    empty.usage.quantity = 0;
    empty.usage.uses = Some(LimitedUses {
        value: 0,
        max: 1,
        per: Some(UsePeriod::Charges),
        auto_destroy: false,
    });
    actor.inventory.push(empty.clone());

    let gateway = MemoryGateway::new(actor.clone());
    let choices = ScriptedChoices::answering(use_choice(true, false));
    let placer = RecordingPlacer::default();
    let evaluator = StubEvaluator::new(3);
    let workflow = UsageWorkflow::new(&choices, &gateway, &placer, &evaluator);

    let outcome = workflow
        .run(&empty, &actor, UsageOptions::default())
        .await
        .unwrap();

    match outcome {
        UsageOutcome::Aborted(AbortReason::NoUsesRemaining { item }) => {
            assert_eq!(item, "Empty Vial");
        }
        other => panic!("expected a no-uses abort, got {other:?}"),
    }
}

#[tokio::test]
async fn area_placement_is_signalled_with_the_spend_scale() {
    let mut actor = hero();
    let mut hands = spell(ItemId(1), "Burning Hands", 1);
    hands.usage.target = Some(TargetProfile {
        target_type: TargetType::Cone,
    });
    actor.inventory.push(hands.clone());

    let gateway = MemoryGateway::new(actor.clone());
    let choices = ScriptedChoices::answering(use_choice(true, true));
    let placer = RecordingPlacer::default();
    let evaluator = StubEvaluator::new(3);
    let workflow = UsageWorkflow::new(&choices, &gateway, &placer, &evaluator);

    let options = UsageOptions {
        spent_cost: Some(3),
        ..Default::default()
    };
    let outcome = workflow.run(&hands, &actor, options).await.unwrap();

    assert!(outcome.report().unwrap().area_placed);
    let requests = placer.requests();
    assert_eq!(requests.len(), 1);
    let (name, request) = &requests[0];
    assert_eq!(name, "Burning Hands");
    // Cone standard size 15, scaled by the 3 mana spent.
    assert_eq!(request.distance, 45);
}

#[tokio::test]
async fn save_dc_is_reported_from_the_owners_derived_stats() {
    let mut actor = hero();
    actor.spell_dc = 16;
    let mut grasp = spell(ItemId(1), "Grasping Vines", 1);
    grasp.usage.save = Some(SaveProfile {
        save_type: SaveType::Reflex,
        scaling: SaveScaling::SpellDc,
        dc: None,
    });
    actor.inventory.push(grasp.clone());

    let gateway = MemoryGateway::new(actor.clone());
    let choices = ScriptedChoices::answering(use_choice(true, false));
    let placer = RecordingPlacer::default();
    let evaluator = StubEvaluator::new(3);
    let workflow = UsageWorkflow::new(&choices, &gateway, &placer, &evaluator);

    let outcome = workflow
        .run(&grasp, &actor, UsageOptions::default())
        .await
        .unwrap();

    let save = outcome.report().unwrap().save.unwrap();
    assert_eq!(save.save_type, SaveType::Reflex);
    assert_eq!(save.dc, Some(16));

    // The report is what the host chat layer renders; it must serialize.
    let json = serde_json::to_value(outcome.report().unwrap()).unwrap();
    assert_eq!(json["item"], "Grasping Vines");
    assert_eq!(json["save"]["dc"], 16);
}
