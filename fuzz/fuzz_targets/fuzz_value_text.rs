#![no_main]
use fsgsave::PropertyType;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    for kind in PropertyType::VALUE_TYPES {
        if let Some(value) = kind.parse(text).unwrap() {
            let formatted = kind.format(&value).unwrap();
            assert_eq!(kind.parse(&formatted).unwrap(), Some(value));
        }
    }
});
