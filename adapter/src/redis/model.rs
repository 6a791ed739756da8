use kernel::model::auth::AccessToken;

// Redis に入れるキーはトークン文字列に接頭辞を付けた形にする
pub struct AuthorizationKey(String);

const AUTHORIZATION_KEY_PREFIX: &str = "auth:token:";

impl From<&AccessToken> for AuthorizationKey {
    fn from(value: &AccessToken) -> Self {
        Self(format!("{AUTHORIZATION_KEY_PREFIX}{}", value.0))
    }
}

impl AuthorizationKey {
    pub fn inner_ref(&self) -> &str {
        &self.0
    }
}
