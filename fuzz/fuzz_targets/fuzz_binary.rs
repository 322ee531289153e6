#![no_main]
use fsgsave::{BinaryCodec, XmlCodec};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let codec = BinaryCodec::new();
    if let Ok(save) = codec.deserialize(data) {
        let consumed = save.length.unwrap() as usize;
        let mut out = Vec::new();
        codec.serialize(&mut out, &save).unwrap();
        assert_eq!(out.len(), consumed);

        let mut xml = Vec::new();
        XmlCodec::new().serialize(&mut xml, &save).unwrap();
        let restored = XmlCodec::new().deserialize(xml.as_slice()).unwrap();
        assert_eq!(restored, save);
    }
});
