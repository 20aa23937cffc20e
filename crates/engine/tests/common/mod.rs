#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::io::{Read, Write};
use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::thread::JoinHandle;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use ciborium::Value;
use coset::{iana, CoseSign1, CoseSign1Builder, HeaderBuilder, TaggedCborSerializable};
use openssl::asn1::Asn1Time;
use openssl::bn::BigNum;
use openssl::ec::{EcGroup, EcKey};
use openssl::ecdsa::EcdsaSig;
use openssl::hash::MessageDigest;
use openssl::nid::Nid;
use openssl::pkey::{PKey, Private};
use openssl::rsa::Rsa;
use openssl::x509::{X509Builder, X509NameBuilder, X509};
use rcgen::{Certificate, CertificateParams, KeyPair};
use tempfile::TempDir;

use vacdec_certs::domain::error::{EngineError, EngineResult};
use vacdec_certs::domain::fetcher::TrustListFetcher;
use vacdec_certs::{Country, EcCurve, FetchConfig, LimitsConfig};

/// A root certificate together with the key that signs trust lists under it.
pub struct SigningRoot {
    pub cert: X509,
    pub key: PKey<Private>,
    pub curve: EcCurve,
}

fn rcgen_root(alg: &'static rcgen::SignatureAlgorithm, curve: EcCurve) -> SigningRoot {
    let key = KeyPair::generate(alg).expect("keypair");
    let mut params = CertificateParams::new(vec![]);
    params.alg = alg;
    params.key_pair = Some(key);
    let cert = Certificate::from_params(params).expect("cert");
    let cert_pem = cert.serialize_pem().expect("cert pem");
    let key_pem = cert.serialize_private_key_pem();
    SigningRoot {
        cert: X509::from_pem(cert_pem.as_bytes()).expect("parse cert"),
        key: PKey::private_key_from_pem(key_pem.as_bytes()).expect("parse key"),
        curve,
    }
}

/// Self-signed P-256 root generated with rcgen.
pub fn p256_root() -> SigningRoot {
    rcgen_root(&rcgen::PKCS_ECDSA_P256_SHA256, EcCurve::P256)
}

/// Self-signed P-384 root generated with rcgen.
pub fn p384_root() -> SigningRoot {
    rcgen_root(&rcgen::PKCS_ECDSA_P384_SHA384, EcCurve::P384)
}

pub fn ec_key(nid: Nid) -> PKey<Private> {
    let group = EcGroup::from_curve_name(nid).expect("group");
    PKey::from_ec_key(EcKey::generate(&group).expect("ec key")).expect("pkey")
}

pub fn rsa_key() -> PKey<Private> {
    PKey::from_rsa(Rsa::generate(2048).expect("rsa")).expect("pkey")
}

/// Self-signed certificate for any OpenSSL key, for key types rcgen does not cover.
pub fn self_signed(key: &PKey<Private>, cn: &str) -> X509 {
    let mut name = X509NameBuilder::new().expect("name");
    name.append_entry_by_text("CN", cn).expect("cn");
    let name = name.build();

    let mut b = X509Builder::new().expect("builder");
    b.set_version(2).expect("version");
    let serial = BigNum::from_u32(1).and_then(|n| n.to_asn1_integer()).expect("serial");
    b.set_serial_number(&serial).expect("serial");
    b.set_subject_name(&name).expect("subject");
    b.set_issuer_name(&name).expect("issuer");
    b.set_pubkey(key).expect("pubkey");
    b.set_not_before(&Asn1Time::days_from_now(0).expect("time")).expect("not before");
    b.set_not_after(&Asn1Time::days_from_now(365).expect("time")).expect("not after");
    b.sign(key, MessageDigest::sha256()).expect("sign");
    b.build()
}

/// A document signer certificate as it would appear inside a trust list.
pub fn signer_certificate(cn: &str) -> X509 {
    self_signed(&ec_key(Nid::X9_62_PRIME256V1), cn)
}

/// Root wrapping an OpenSSL-generated EC key.
pub fn root_from_key(key: PKey<Private>, curve: EcCurve) -> SigningRoot {
    SigningRoot {
        cert: self_signed(&key, "test root"),
        key,
        curve,
    }
}

/// ECDSA over `data` in the fixed-width `r || s` form COSE uses.
pub fn raw_ecdsa_sign(key: &PKey<Private>, curve: EcCurve, data: &[u8]) -> Vec<u8> {
    let mut signer = openssl::sign::Signer::new(curve.digest(), key).expect("signer");
    signer.update(data).expect("update");
    let der = signer.sign_to_vec().expect("sign");
    let sig = EcdsaSig::from_der(&der).expect("ecdsa sig");
    let n = curve.coordinate_size() as i32;
    let mut out = sig.r().to_vec_padded(n).expect("r");
    out.extend(sig.s().to_vec_padded(n).expect("s"));
    out
}

/// Detached COSE_Sign1 over `content` with an explicit header algorithm.
pub fn sign1_with_alg(root: &SigningRoot, alg: iana::Algorithm, content: &[u8]) -> CoseSign1 {
    let protected = HeaderBuilder::new().algorithm(alg).build();
    CoseSign1Builder::new()
        .protected(protected)
        .create_detached_signature(content, &[], |tbs| raw_ecdsa_sign(&root.key, root.curve, tbs))
        .build()
}

/// Tagged, detached COSE_Sign1 bytes over `content`.
pub fn sign_detached(root: &SigningRoot, content: &[u8]) -> Vec<u8> {
    sign1_with_alg(root, root.curve.algorithm(), content)
        .to_tagged_vec()
        .expect("encode sign1")
}

/// One trust list entry: key id and an optional DER certificate.
pub struct Entry {
    pub key_id: Vec<u8>,
    pub der: Option<Vec<u8>>,
}

impl Entry {
    pub fn new(key_id: &[u8], cert: &X509) -> Self {
        Self {
            key_id: key_id.to_vec(),
            der: Some(cert.to_der().expect("der")),
        }
    }

    pub fn without_certificate(key_id: &[u8]) -> Self {
        Self {
            key_id: key_id.to_vec(),
            der: None,
        }
    }
}

/// CBOR trust list content `{ "c": [ { "i": .., "c": .. }, .. ] }`.
pub fn trust_list_cbor(entries: &[Entry]) -> Vec<u8> {
    let items = entries
        .iter()
        .map(|e| {
            let mut fields = vec![(Value::Text("i".into()), Value::Bytes(e.key_id.clone()))];
            if let Some(der) = &e.der {
                fields.push((Value::Text("c".into()), Value::Bytes(der.clone())));
            }
            Value::Map(fields)
        })
        .collect();
    encode_cbor(&Value::Map(vec![(Value::Text("c".into()), Value::Array(items))]))
}

pub fn encode_cbor(value: &Value) -> Vec<u8> {
    let mut buf = Vec::new();
    ciborium::into_writer(value, &mut buf).expect("cbor");
    buf
}

/// Master data response body wrapping a signed trust list.
pub fn masterdata_json(signature: &[u8], content: &[u8]) -> Vec<u8> {
    serde_json::json!({
        "epochUTC": 1634194801000i64,
        "valueSets": [],
        "rules": [],
        "trustList": {
            "timeStamp": "2021-10-14T07:00:01.000000",
            "trustListSignature": STANDARD.encode(signature),
            "trustListContent": STANDARD.encode(content),
        }
    })
    .to_string()
    .into_bytes()
}

/// Signed master data for `entries` under `root`.
pub fn signed_masterdata(root: &SigningRoot, entries: &[Entry]) -> Vec<u8> {
    let content = trust_list_cbor(entries);
    masterdata_json(&sign_detached(root, &content), &content)
}

/// Temporary layout with an anchors directory and a destination directory.
pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("tempdir"),
        }
    }

    /// Workspace with `root` installed as the Austrian trust anchor.
    pub fn with_anchor(root: &X509) -> Self {
        let ws = Self::new();
        ws.write_anchor(root);
        ws
    }

    pub fn anchors_dir(&self) -> PathBuf {
        self.dir.path().join("anchors")
    }

    pub fn out_dir(&self) -> PathBuf {
        self.dir.path().join("out")
    }

    pub fn write_anchor(&self, root: &X509) -> PathBuf {
        let path = self.anchors_dir().join("roots").join("Austria-prod.pem");
        std::fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        std::fs::write(&path, root.to_pem().expect("pem")).expect("write anchor");
        path
    }

    pub fn config(&self) -> FetchConfig {
        let mut cfg = FetchConfig::secure_default(Country::Austria, self.out_dir());
        cfg.anchors_dir = self.anchors_dir();
        cfg
    }

    /// File names in the destination directory, sorted.
    pub fn stored_files(&self) -> Vec<String> {
        list_dir(&self.out_dir())
    }
}

pub fn list_dir(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = match std::fs::read_dir(dir) {
        Ok(rd) => rd
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect(),
        Err(_) => Vec::new(),
    };
    names.sort();
    names
}

/// Serves a canned body and counts calls.
pub struct StaticFetcher {
    body: Vec<u8>,
    pub calls: Cell<usize>,
    pub last_url: RefCell<Option<String>>,
}

impl StaticFetcher {
    pub fn new(body: Vec<u8>) -> Self {
        Self {
            body,
            calls: Cell::new(0),
            last_url: RefCell::new(None),
        }
    }
}

impl TrustListFetcher for StaticFetcher {
    fn fetch(&self, url: &str, _limits: &LimitsConfig) -> EngineResult<Vec<u8>> {
        self.calls.set(self.calls.get() + 1);
        *self.last_url.borrow_mut() = Some(url.to_string());
        Ok(self.body.clone())
    }
}

/// Always fails like an unreachable endpoint.
#[derive(Default)]
pub struct FailingFetcher {
    pub calls: Cell<usize>,
}

impl TrustListFetcher for FailingFetcher {
    fn fetch(&self, url: &str, _limits: &LimitsConfig) -> EngineResult<Vec<u8>> {
        self.calls.set(self.calls.get() + 1);
        Err(EngineError::FetchFailed(format!("GET {url}: connection refused")))
    }
}

/// Answer exactly one HTTP request with `status` and `body`.
pub fn serve_once(status: &'static str, body: Vec<u8>) -> (String, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    let handle = std::thread::spawn(move || {
        if let Ok((mut stream, _)) = listener.accept() {
            let mut buf = [0u8; 4096];
            let _ = stream.read(&mut buf);
            let head = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            let _ = stream.write_all(head.as_bytes());
            let _ = stream.write_all(&body);
        }
    });
    (format!("http://{addr}/api/masterdata"), handle)
}

/// Accept one connection and say nothing for `delay`.
pub fn serve_silence(delay: Duration) -> (String, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    let handle = std::thread::spawn(move || {
        if let Ok((stream, _)) = listener.accept() {
            std::thread::sleep(delay);
            drop(stream);
        }
    });
    (format!("http://{addr}/api/masterdata"), handle)
}
