use menuet::{
    AssetInventory, AssetKind, ComposeEnv, Config, Selection, compose, scene_fingerprint,
};

fn mix64(mut z: u64) -> u64 {
    // SplitMix64 mixing function.
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

fn digest_u64(bytes: &[u8]) -> u64 {
    let mut state = 0x9E37_79B9_7F4A_7C15u64;
    for chunk in bytes.chunks(8) {
        let mut v = 0u64;
        for (i, &b) in chunk.iter().enumerate() {
            v |= (b as u64) << (i * 8);
        }
        state = mix64(state ^ v);
    }
    state
}

fn fixture() -> Config {
    serde_json::from_str(include_str!("data/sample_config.json")).unwrap()
}

fn inventory() -> AssetInventory {
    let mut inv = AssetInventory::default();
    inv.add(AssetKind::Font, "title.ttf");
    inv.add(AssetKind::Font, "text.ttf");
    inv.add(AssetKind::Background, "beach.png");
    inv.add(AssetKind::Icon, "star.png");
    inv.add(AssetKind::WidgetImage, "logo.png");
    inv
}

fn config_digest(config: &Config, inv: &AssetInventory) -> u64 {
    let env = ComposeEnv::new(inv);
    let mut digest = 0u64;
    for menu in &config.menus {
        let scene = compose(menu, &env, Selection::None, None);
        let bytes = serde_json::to_vec(&scene).unwrap();
        digest ^= digest_u64(&bytes);
    }
    digest
}

#[test]
fn compose_snapshot_is_deterministic() {
    let config = fixture();
    let inv = inventory();
    assert_eq!(config_digest(&config, &inv), config_digest(&config, &inv));
}

#[test]
fn composition_survives_a_persistence_round_trip() {
    let config = fixture();
    let reloaded: Config = serde_json::from_str(&config.to_json_pretty().unwrap()).unwrap();
    let inv = inventory();
    let env = ComposeEnv::new(&inv);
    for (a, b) in config.menus.iter().zip(&reloaded.menus) {
        let first = compose(a, &env, Selection::None, None);
        let second = compose(b, &env, Selection::None, None);
        assert_eq!(first, second);
        assert_eq!(scene_fingerprint(&first), scene_fingerprint(&second));
    }
}

#[test]
fn fingerprint_distinguishes_the_fixture_menus() {
    let config = fixture();
    let inv = inventory();
    let env = ComposeEnv::new(&inv);
    let main = compose(&config.menus[0], &env, Selection::None, None);
    let alt = compose(&config.menus[1], &env, Selection::None, None);
    assert_ne!(scene_fingerprint(&main), scene_fingerprint(&alt));
}
