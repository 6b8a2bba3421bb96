use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

/// HMAC-SHA256，hex 编码
pub fn hmac_sha256_hex(secret: &str, data: &str) -> String {
    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(mac) => mac,
        Err(_) => return String::new(),
    };
    mac.update(data.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// 常数时间比较 hex 签名；非法 hex 直接判为不匹配
pub fn verify_hmac_sha256_hex(secret: &str, data: &str, signature_hex: &str) -> bool {
    let Ok(expected) = hex::decode(signature_hex.trim()) else {
        return false;
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(data.as_bytes());
    mac.verify_slice(&expected).is_ok()
}

pub fn sha256_hex(data: &str) -> String {
    hex::encode(Sha256::digest(data.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hmac_known_vector() {
        // RFC 4231 test case 2
        assert_eq!(
            hmac_sha256_hex("Jefe", "what do ya want for nothing?"),
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn test_verify_accepts_own_signature() {
        let sig = hmac_sha256_hex("s", "o1|p1");
        assert!(verify_hmac_sha256_hex("s", "o1|p1", &sig));
        assert!(verify_hmac_sha256_hex("s", "o1|p1", &sig.to_uppercase()));
    }

    #[test]
    fn test_verify_rejects_tampered_or_garbage() {
        let sig = hmac_sha256_hex("s", "o1|p1");
        assert!(!verify_hmac_sha256_hex("s", "o1|p2", &sig));
        assert!(!verify_hmac_sha256_hex("other", "o1|p1", &sig));
        assert!(!verify_hmac_sha256_hex("s", "o1|p1", "not-hex"));
        assert!(!verify_hmac_sha256_hex("s", "o1|p1", ""));
    }

    #[test]
    fn test_sha256_hex() {
        assert_eq!(
            sha256_hex("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
