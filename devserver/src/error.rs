use thiserror::Error;

#[derive(Error, Debug)]
pub enum DevServerError {
    #[error("config error: {0}")]
    Config(String),
    #[error("cannot listen on {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl DevServerError {
    // 0: success
    // 11: config error
    // 20: bind / IO error
    // 50: internal/uncategorized
    pub fn exit_code(&self) -> i32 {
        match self {
            DevServerError::Config(_) => 11,
            DevServerError::Bind { .. } | DevServerError::Io(_) => 20,
            DevServerError::Anyhow(_) => 50,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes() {
        assert_eq!(DevServerError::Config("x".into()).exit_code(), 11);
        let bind = DevServerError::Bind {
            addr: "127.0.0.1:10086".into(),
            source: std::io::Error::new(std::io::ErrorKind::AddrInUse, "in use"),
        };
        assert_eq!(bind.exit_code(), 20);
        assert!(bind.to_string().contains("127.0.0.1:10086"));
        assert_eq!(DevServerError::Anyhow(anyhow::anyhow!("boom")).exit_code(), 50);
    }
}
