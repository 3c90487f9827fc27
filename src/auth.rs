/// Credentials attached to every outgoing request.
#[derive(Debug, Clone, Default)]
pub enum Auth {
    #[default]
    None,
    Basic {
        username: String,
        password: Option<String>,
    },
    Bearer(String),
}

impl Auth {
    pub fn apply(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self {
            Auth::None => request,
            Auth::Basic { username, password } => {
                request.basic_auth(username, password.as_deref())
            }
            Auth::Bearer(token) => request.bearer_auth(token),
        }
    }
}
