
use std::env;

use tempfile::TempDir;

pub(crate) const TEST_SECRET: &str = "test-secret-key-at-least-32-bytes-long";

/// RAII guard for environment variables - restores on drop
pub(crate) struct EnvGuard {
    key: &'static str,
    original: Option<String>,
}

impl EnvGuard {
    pub(crate) fn set(key: &'static str, value: &str) -> Self {
        unsafe {
            let original = env::var(key).ok();
            env::set_var(key, value);
            Self { key, original }
        }
    }

    pub(crate) fn remove(key: &'static str) -> Self {
        unsafe {
            let original = env::var(key).ok();
            env::remove_var(key);
            Self { key, original }
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        unsafe {
            match &self.original {
                Some(val) => env::set_var(self.key, val),
                None => env::remove_var(self.key),
            }
        }
    }
}

/// Temp config directory pointed to by LM_CONFIG_DIR, with a valid secret and no
/// stray auth overrides from the surrounding environment
pub(crate) struct TestConfigDir {
    pub temp: TempDir,
    _dir: EnvGuard,
    _secret: EnvGuard,
    _public_key: EnvGuard,
}

pub(crate) fn setup_config_dir() -> TestConfigDir {
    let temp = TempDir::new().unwrap();
    let dir = EnvGuard::set(crate::CONFIG_DIR_ENV, temp.path().to_str().unwrap());
    let secret = EnvGuard::set("LM_AUTH_JWT_SECRET", TEST_SECRET);
    let public_key = EnvGuard::remove("LM_AUTH_JWT_PUBLIC_KEY_PATH");
    TestConfigDir {
        temp,
        _dir: dir,
        _secret: secret,
        _public_key: public_key,
    }
}

pub(crate) fn write_config(dir: &TestConfigDir, contents: &str) {
    std::fs::write(dir.temp.path().join(crate::CONFIG_FILE_NAME), contents).unwrap();
}
