#![allow(dead_code)]

pub mod http_server;

/// Builds an in-memory tar archive from `(member path, contents)` pairs.
pub fn tar_bytes(members: &[(&str, &[u8])]) -> Vec<u8> {
    let mut builder = tar::Builder::new(Vec::new());
    for (name, data) in members {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder.append_data(&mut header, name, *data).unwrap();
    }
    builder.into_inner().unwrap()
}

/// A typical PaddleOCR inference archive: files nested one level deep plus noise.
pub fn model_archive() -> Vec<u8> {
    tar_bytes(&[
        ("en_rec_infer/inference.pdiparams", b"params-bytes"),
        ("en_rec_infer/inference.pdiparams.info", b"info-bytes"),
        ("en_rec_infer/inference.pdmodel", b"model-bytes"),
        ("en_rec_infer/LICENSE", b"license"),
    ])
}
