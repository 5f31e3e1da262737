use proptest::prelude::*;
use exectester::interpolate::{DEFAULT_INTERPOLATION_TOKEN, interpolate};
use exectester::types::InterpolationMode;

// Text that can never contain the default token (no underscores).
fn plain_text() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 .:!-]{0,40}"
}

fn mode() -> impl Strategy<Value = InterpolationMode> {
    prop_oneof![
        Just(InterpolationMode::IntCounter),
        Just(InterpolationMode::String),
    ]
}

proptest! {
    #[test]
    fn template_without_token_is_unchanged(
        template in plain_text(),
        mode in mode(),
        counter in any::<u64>(),
        seed in "[a-z0-9]{0,8}",
    ) {
        let out = interpolate(&template, DEFAULT_INTERPOLATION_TOKEN, mode, counter, &seed);
        prop_assert_eq!(out.text, template);
        prop_assert!(out.warning.is_none());
    }

    #[test]
    fn int_counter_renders_seed_plus_counter(
        prefix in plain_text(),
        suffix in plain_text(),
        seed in -1_000_000i64..1_000_000,
        counter in 0u64..1_000_000,
    ) {
        let template = format!("{prefix}__I__{suffix}");
        let out = interpolate(
            &template,
            DEFAULT_INTERPOLATION_TOKEN,
            InterpolationMode::IntCounter,
            counter,
            &seed.to_string(),
        );
        prop_assert_eq!(out.text, format!("{prefix}{}{suffix}", seed + counter as i64));
        prop_assert!(out.warning.is_none());
    }

    #[test]
    fn string_mode_ignores_counter(
        prefix in plain_text(),
        seed in "[a-z]{0,10}",
        a in any::<u64>(),
        b in any::<u64>(),
    ) {
        let template = format!("{prefix}__I__|__I__");
        let first = interpolate(&template, DEFAULT_INTERPOLATION_TOKEN, InterpolationMode::String, a, &seed);
        let second = interpolate(&template, DEFAULT_INTERPOLATION_TOKEN, InterpolationMode::String, b, &seed);
        prop_assert_eq!(&first.text, &format!("{prefix}{seed}|{seed}"));
        prop_assert_eq!(first, second);
    }

    #[test]
    fn non_numeric_seed_falls_back_to_counter(
        seed in "[a-z]{1,10}",
        counter in 0u64..10_000,
    ) {
        let out = interpolate(
            "n=__I__",
            DEFAULT_INTERPOLATION_TOKEN,
            InterpolationMode::IntCounter,
            counter,
            &seed,
        );
        prop_assert_eq!(out.text, format!("n={counter}"));
        prop_assert!(out.warning.is_some());
    }
}
