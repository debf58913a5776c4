use serde::{Deserialize, Serialize};

/// ICE server configuration for WebRTC
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IceServer {
    /// Server URLs (can have multiple for failover)
    pub urls: Vec<String>,
    /// Username for authentication (required for TURN)
    pub username: Option<String>,
    /// Credential for authentication (required for TURN)
    pub credential: Option<String>,
}

impl IceServer {
    pub fn stun(url: impl Into<String>) -> Self {
        Self::from_urls(vec![url.into()])
    }

    pub fn turn(
        url: impl Into<String>,
        username: impl Into<String>,
        credential: impl Into<String>,
    ) -> Self {
        Self::stun(url).with_auth(username, credential)
    }

    pub fn from_urls(urls: Vec<String>) -> Self {
        Self {
            urls,
            username: None,
            credential: None,
        }
    }

    pub fn with_auth(mut self, username: impl Into<String>, credential: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.credential = Some(credential.into());
        self
    }

    /// One STUN entry carrying every URL of a comma separated list
    /// (`stun:a:3478,stun:b:3478`). Empty entries are skipped.
    pub fn parse_stun_list(list: &str) -> Option<Self> {
        let urls: Vec<String> = list
            .split(',')
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(str::to_string)
            .collect();

        if urls.is_empty() {
            None
        } else {
            Some(Self::from_urls(urls))
        }
    }

    /// Google STUN servers used when nothing is configured
    pub fn default_stun_servers() -> Vec<Self> {
        vec![Self::from_urls(vec![
            "stun:stun.l.google.com:19302".to_string(),
            "stun:stun1.l.google.com:19302".to_string(),
        ])]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_server_carries_auth() {
        let server = IceServer::turn("turn:turn.example.com:3478", "user", "pass");
        assert_eq!(server.urls, vec!["turn:turn.example.com:3478"]);
        assert_eq!(server.username.as_deref(), Some("user"));
        assert_eq!(server.credential.as_deref(), Some("pass"));
    }

    #[test]
    fn test_parse_stun_list() {
        let server = IceServer::parse_stun_list(" stun:a:3478, ,stun:b:3478 ").unwrap();
        assert_eq!(server.urls, vec!["stun:a:3478", "stun:b:3478"]);
        assert!(server.username.is_none());
    }

    #[test]
    fn test_parse_empty_stun_list() {
        assert!(IceServer::parse_stun_list(" , ").is_none());
    }

    #[test]
    fn test_default_stun_servers() {
        let servers = IceServer::default_stun_servers();
        assert_eq!(servers.len(), 1);
        assert_eq!(servers[0].urls.len(), 2);
    }
}
