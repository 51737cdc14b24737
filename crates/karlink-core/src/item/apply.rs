use tracing::{debug, info};

use super::{ItemDef, ItemEffect, PatchDelta, PatchTarget, SpecialEffect};
use crate::memory::layout::health;
use crate::memory::{GameMemory, MemoryBackend};

/// Apply one received item to the running game.
///
/// Returns false if any memory write failed. Writes already made stay made.
pub fn apply_item<B: MemoryBackend>(memory: &mut GameMemory<B>, item: &ItemDef) -> bool {
    info!("Applying {} ({})", item.name, item.code);
    apply_effect(memory, item.effect)
}

pub fn apply_effect<B: MemoryBackend>(memory: &mut GameMemory<B>, effect: ItemEffect) -> bool {
    match effect {
        ItemEffect::Patch { target, delta } => apply_patch(memory, target, delta),
        ItemEffect::Special(SpecialEffect::OneHp) => {
            memory.write_pointer_float(health::MACHINE_HP, 1.0)
        }
        ItemEffect::Special(SpecialEffect::FullHeal) => {
            let max_hp = memory.read_float(health::MAX_HP);
            memory.write_pointer_float(health::MACHINE_HP, max_hp)
        }
        ItemEffect::Reward => true,
    }
}

fn apply_patch<B: MemoryBackend>(
    memory: &mut GameMemory<B>,
    target: PatchTarget,
    delta: PatchDelta,
) -> bool {
    let mut ok = true;
    for stat in target.stats() {
        let address = stat.address();
        let current = memory.read_float(address);
        let updated = current + delta.amount();
        debug!("{}: {} -> {}", stat, current, updated);
        ok &= memory.write_float(address, updated);
    }
    ok
}

/// Destroy the player's current machine (incoming death)
pub fn kill_player<B: MemoryBackend>(memory: &mut GameMemory<B>) -> bool {
    info!("Received a death, destroying machine");
    memory.write_pointer_float(health::MACHINE_HP, 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{ItemCatalog, PatchStat};
    use crate::memory::MockBackend;
    use strum::IntoEnumIterator;

    const MACHINE: u32 = 0x8120_0000;

    fn setup() -> (GameMemory<MockBackend>, ItemCatalog) {
        let mut backend = MockBackend::with_game_loaded();
        backend.set_u32(health::MACHINE_HP.base, MACHINE);
        for (i, stat) in PatchStat::iter().enumerate() {
            backend.set_f32(stat.address(), i as f32);
        }
        let mut memory = GameMemory::new(backend);
        memory.attach().unwrap();
        (memory, ItemCatalog::builtin())
    }

    fn machine_hp(memory: &GameMemory<MockBackend>) -> f32 {
        memory
            .backend()
            .get_f32(MACHINE + health::MACHINE_HP.offset)
    }

    #[test]
    fn test_boost_up_then_down_restores_value() {
        let (mut memory, catalog) = setup();
        memory.backend_mut().set_f32(PatchStat::Boost.address(), 4.0);

        assert!(apply_item(&mut memory, catalog.by_name("Boost Up").unwrap()));
        assert_eq!(memory.backend().get_f32(PatchStat::Boost.address()), 5.0);

        assert!(apply_item(&mut memory, catalog.by_name("Boost Down").unwrap()));
        assert_eq!(memory.backend().get_f32(PatchStat::Boost.address()), 4.0);
    }

    #[test]
    fn test_single_patch_touches_one_stat() {
        let (mut memory, catalog) = setup();
        apply_item(&mut memory, catalog.by_name("Glide Down").unwrap());

        for (i, stat) in PatchStat::iter().enumerate() {
            let expected = if stat == PatchStat::Glide {
                i as f32 - 1.0
            } else {
                i as f32
            };
            assert_eq!(memory.backend().get_f32(stat.address()), expected);
        }
    }

    #[test]
    fn test_all_up_raises_every_stat() {
        let (mut memory, catalog) = setup();
        assert!(apply_item(&mut memory, catalog.get(57).unwrap()));

        for (i, stat) in PatchStat::iter().enumerate() {
            assert_eq!(memory.backend().get_f32(stat.address()), i as f32 + 1.0);
        }
    }

    #[test]
    fn test_permanent_patch_is_plus_one() {
        let (mut memory, catalog) = setup();
        apply_item(&mut memory, catalog.by_name("Charge Up: Permanent +1").unwrap());
        let charge = PatchStat::iter().position(|s| s == PatchStat::Charge).unwrap();
        assert_eq!(
            memory.backend().get_f32(PatchStat::Charge.address()),
            charge as f32 + 1.0
        );
    }

    #[test]
    fn test_one_hp_and_full_heal() {
        let (mut memory, catalog) = setup();
        memory.backend_mut().set_f32(health::MAX_HP, 160.0);

        assert!(apply_item(&mut memory, catalog.by_name("1 HP").unwrap()));
        assert_eq!(machine_hp(&memory), 1.0);

        assert!(apply_item(&mut memory, catalog.by_name("Full Heal").unwrap()));
        assert_eq!(machine_hp(&memory), 160.0);
    }

    #[test]
    fn test_kill_player() {
        let (mut memory, _) = setup();
        memory
            .backend_mut()
            .set_f32(MACHINE + health::MACHINE_HP.offset, 80.0);
        assert!(kill_player(&mut memory));
        assert_eq!(machine_hp(&memory), 0.0);
    }

    #[test]
    fn test_reward_has_no_memory_effect() {
        let (mut memory, _) = setup();
        let before = memory.backend().get_bytes(0x8157_862C, 0x24);
        assert!(apply_effect(&mut memory, ItemEffect::Reward));
        assert_eq!(memory.backend().get_bytes(0x8157_862C, 0x24), before);
    }

    #[test]
    fn test_detached_apply_reports_failure() {
        let (mut memory, catalog) = setup();
        memory.detach();
        assert!(!apply_item(&mut memory, catalog.by_name("Turn Up").unwrap()));
        assert!(!kill_player(&mut memory));
    }
}
