#![no_main]
use fsgsave::{BinaryCodec, XmlCodec};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(save) = XmlCodec::new().deserialize(data) {
        let mut out = Vec::new();
        if BinaryCodec::new().serialize(&mut out, &save).is_ok() {
            let restored = BinaryCodec::new().deserialize(out.as_slice()).unwrap();
            assert_eq!(restored.sessions, save.sessions);
        }
    }
});
