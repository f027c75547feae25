//! In-process stand-ins for git, openssl, the portal and the keychain.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use matchbook::core::cache::Memory;
use matchbook::core::cipher::{Cipher, Direction};
use matchbook::core::config::Config;
use matchbook::core::domain::{CertType, CredentialKind, Environment, KeyType, Passphrase, Platform, ProfileType};
use matchbook::core::generator::Generator;
use matchbook::core::git::{Checkout, Vcs};
use matchbook::core::installer::Installer;
use matchbook::core::passphrase::{Passphrases, Prompt, StoreIdentity};
use matchbook::core::pipeline::Collaborators;
use matchbook::core::portal::Portal;
use matchbook::error::{CipherError, GenerationError, PassphraseError, Result};
use tempfile::TempDir;

use super::fixtures::{profile_bytes, APP, CERT, P12, REMOTE};

/// Passphrase the seeded stores are encrypted with.
pub const PASSPHRASE: &str = "correct horse battery staple";

/// UUID of every profile the fake generator produces.
pub const GENERATED_UUID: &str = "5b3d7c1e-0a4f-4a8e-9f7d-2c6b1e0d9a11";

/// Stem of every certificate the fake generator produces.
pub const GENERATED_CERT: &str = "GENERATED1";

/// A reversible cipher that remembers the passphrase in a header, so a wrong
/// one is detected on every file.
#[derive(Debug, Default, Clone, Copy)]
pub struct Toy;

impl Toy {
    pub fn seal(passphrase: &str, content: &[u8]) -> Vec<u8> {
        let mut out = format!("TOY:{}:", passphrase).into_bytes();
        out.extend_from_slice(content);
        out
    }

    pub fn open(passphrase: &str, sealed: &[u8]) -> Option<Vec<u8>> {
        let header = format!("TOY:{}:", passphrase);
        sealed.strip_prefix(header.as_bytes()).map(|rest| rest.to_vec())
    }
}

impl Cipher for Toy {
    fn transform(
        &self,
        input: &Path,
        output: &Path,
        passphrase: &Passphrase,
        direction: Direction,
    ) -> Result<()> {
        let data = fs::read(input)?;
        let result = match direction {
            Direction::Encrypt => Self::seal(passphrase.expose(), &data),
            Direction::Decrypt => Self::open(passphrase.expose(), &data).ok_or_else(|| {
                CipherError::WrongPassphrase {
                    path: input.to_path_buf(),
                }
            })?,
        };
        fs::write(output, result)?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "toy"
    }
}

/// Answers passphrase prompts from a script and counts how often it was asked.
pub struct ScriptedPrompt {
    answers: Mutex<VecDeque<String>>,
    asked: Arc<AtomicUsize>,
}

impl ScriptedPrompt {
    pub fn new(answers: &[&str]) -> (Self, Arc<AtomicUsize>) {
        let asked = Arc::new(AtomicUsize::new(0));
        let prompt = Self {
            answers: Mutex::new(answers.iter().map(|a| a.to_string()).collect()),
            asked: asked.clone(),
        };
        (prompt, asked)
    }
}

impl Prompt for ScriptedPrompt {
    fn ask(&self, _confirm: bool) -> Result<String> {
        self.asked.fetch_add(1, Ordering::SeqCst);
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| PassphraseError::NotInteractive.into())
    }
}

/// Writes placeholder artifacts and records what it was asked for.
pub struct FakeGenerator {
    pub calls: RefCell<Vec<CredentialKind>>,
    /// Fail certificate requests the way a full account does.
    pub account_limit: bool,
    /// Devices listed in generated profiles.
    pub devices: usize,
}

impl Default for FakeGenerator {
    fn default() -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            account_limit: false,
            devices: 3,
        }
    }
}

impl FakeGenerator {
    pub fn count(&self, kind: CredentialKind) -> usize {
        self.calls.borrow().iter().filter(|k| **k == kind).count()
    }
}

impl Generator for FakeGenerator {
    fn certificate(&self, _config: &Config, _cert_type: CertType, output_dir: &Path) -> Result<PathBuf> {
        self.calls.borrow_mut().push(CredentialKind::Certificate);
        if self.account_limit {
            return Err(GenerationError::AccountLimit.into());
        }
        fs::create_dir_all(output_dir)?;
        let cert = output_dir.join(format!("{}.cer", GENERATED_CERT));
        fs::write(&cert, CERT)?;
        fs::write(output_dir.join(format!("{}.p12", GENERATED_CERT)), P12)?;
        fs::write(
            output_dir.join(format!("{}.certSigningRequest", GENERATED_CERT)),
            b"csr",
        )?;
        Ok(cert)
    }

    fn profile(
        &self,
        _config: &Config,
        _profile_type: ProfileType,
        _certificate_id: &str,
        output_dir: &Path,
    ) -> Result<PathBuf> {
        self.calls.borrow_mut().push(CredentialKind::Profile);
        fs::create_dir_all(output_dir)?;
        let path = output_dir.join("downloaded.mobileprovision");
        fs::write(&path, profile_bytes(GENERATED_UUID, self.devices))?;
        Ok(path)
    }

    fn keystore(&self, _config: &Config, _key_type: KeyType, output_dir: &Path) -> Result<PathBuf> {
        self.calls.borrow_mut().push(CredentialKind::Keystore);
        fs::create_dir_all(output_dir)?;
        let path = output_dir.join("GENKEY.keystore");
        fs::write(&path, b"generated keystore")?;
        Ok(path)
    }

    fn supply_key(&self, _config: &Config, _key_type: KeyType, output_dir: &Path) -> Result<PathBuf> {
        self.calls.borrow_mut().push(CredentialKind::SupplyKey);
        fs::create_dir_all(output_dir)?;
        let path = output_dir.join("GENKEY.supply");
        fs::write(&path, br#"{"client_email":"ci@example.iam","private_key":"k"}"#)?;
        Ok(path)
    }
}

/// Records keychain imports and profile installs by file name.
#[derive(Default)]
pub struct FakeInstaller {
    /// Answer to every `is_installed` query.
    pub installed: bool,
    pub imported: RefCell<Vec<String>>,
    pub profiles: RefCell<Vec<String>>,
}

impl Installer for FakeInstaller {
    fn is_installed(&self, _certificate: &Path) -> Result<bool> {
        Ok(self.installed)
    }

    fn import(&self, path: &Path, _keychain: &str) -> Result<()> {
        self.imported.borrow_mut().push(file_name(path));
        Ok(())
    }

    fn install_profile(&self, profile: &Path) -> Result<PathBuf> {
        self.profiles.borrow_mut().push(file_name(profile));
        Ok(profile.to_path_buf())
    }
}

/// A portal with fixed answers.
pub struct FakePortal {
    pub bundle: bool,
    pub certificate: bool,
    pub profile: bool,
    pub devices: usize,
}

impl Default for FakePortal {
    fn default() -> Self {
        Self {
            bundle: true,
            certificate: true,
            profile: true,
            devices: 3,
        }
    }
}

impl Portal for FakePortal {
    fn bundle_identifier_exists(&self, _app_identifier: &str, _platform: Platform) -> Result<bool> {
        Ok(self.bundle)
    }

    fn certificate_exists(&self, _cert_type: CertType, _certificate_id: &str) -> Result<bool> {
        Ok(self.certificate)
    }

    fn profile_exists(&self, _uuid: &str) -> Result<bool> {
        Ok(self.profile)
    }

    fn device_count(&self, _platform: Platform) -> Result<usize> {
        Ok(self.devices)
    }
}

/// A "remote" that is just a directory. Cloning copies it into a fresh
/// temporary checkout; committing copies the checkout back.
pub struct FakeVcs {
    pub remote: TempDir,
    pub commits: RefCell<Vec<String>>,
    pub clones: Cell<usize>,
}

impl FakeVcs {
    pub fn new() -> Self {
        Self {
            remote: TempDir::new().unwrap(),
            commits: RefCell::new(Vec::new()),
            clones: Cell::new(0),
        }
    }

    pub fn path(&self) -> &Path {
        self.remote.path()
    }
}

impl Vcs for FakeVcs {
    fn clone_repo(&self, _remote: &str, _branch: &str, _shallow: bool) -> Result<Checkout> {
        self.clones.set(self.clones.get() + 1);
        let dir = TempDir::new()?;
        copy_tree(self.remote.path(), dir.path())?;
        Ok(Checkout::temporary(dir))
    }

    fn commit(&self, workspace: &Path, message: &str, _remote: &str, _branch: &str) -> Result<bool> {
        for entry in fs::read_dir(self.remote.path())? {
            let path = entry?.path();
            if path.is_dir() {
                fs::remove_dir_all(&path)?;
            } else {
                fs::remove_file(&path)?;
            }
        }
        copy_tree(workspace, self.remote.path())?;
        self.commits.borrow_mut().push(message.to_string());
        Ok(true)
    }
}

/// Every fake wired together around one store.
pub struct Rig {
    pub vcs: FakeVcs,
    pub generator: FakeGenerator,
    pub installer: FakeInstaller,
    pub portal: Option<FakePortal>,
    pub cache: Arc<Memory>,
    pub passphrases: Passphrases,
    pub asked: Arc<AtomicUsize>,
}

impl Rig {
    /// A rig whose cache already knows the store passphrase.
    pub fn new() -> Self {
        let cache = Arc::new(Memory::with(identity().as_str(), PASSPHRASE));
        Self::with_passphrases(cache, None, &[])
    }

    /// A rig with an explicit cache, override and scripted prompt answers.
    pub fn with_passphrases(cache: Arc<Memory>, override_value: Option<&str>, answers: &[&str]) -> Self {
        let (prompt, asked) = ScriptedPrompt::new(answers);
        let passphrases = Passphrases::new(
            override_value.map(str::to_string),
            Box::new(cache.clone()),
            Box::new(prompt),
        );
        Self {
            vcs: FakeVcs::new(),
            generator: FakeGenerator::default(),
            installer: FakeInstaller::default(),
            portal: None,
            cache,
            passphrases,
            asked,
        }
    }

    pub fn collaborators(&self) -> Collaborators<'_> {
        Collaborators {
            vcs: &self.vcs,
            cipher: &Toy,
            generator: &self.generator,
            installer: &self.installer,
            portal: self.portal.as_ref().map(|p| p as &dyn Portal),
            passphrases: &self.passphrases,
        }
    }

    /// Put an encrypted file into the remote store.
    pub fn seed(&self, relative: &str, content: &[u8]) {
        super::fixtures::write(self.vcs.path(), relative, &Toy::seal(PASSPHRASE, content));
    }

    /// Seed a complete distribution identity and an App Store profile.
    pub fn seed_appstore(&self, devices: usize) {
        self.seed("certs/distribution/STORED1.cer", CERT);
        self.seed("certs/distribution/STORED1.p12", P12);
        self.seed(
            &format!("profiles/appstore/AppStore_{}.mobileprovision", APP),
            &profile_bytes(super::fixtures::PROFILE_UUID, devices),
        );
    }

    /// Raw bytes of a file in the remote store.
    pub fn remote_file(&self, relative: &str) -> Vec<u8> {
        fs::read(self.vcs.path().join(relative)).unwrap()
    }

    /// Decrypted bytes of a file in the remote store, with `passphrase`.
    pub fn remote_plain(&self, relative: &str, passphrase: &str) -> Option<Vec<u8>> {
        Toy::open(passphrase, &self.remote_file(relative))
    }

    /// Every file under the remote, relative and sorted.
    pub fn remote_listing(&self) -> Vec<String> {
        let mut files = Vec::new();
        list(self.vcs.path(), self.vcs.path(), &mut files);
        files.sort();
        files
    }
}

/// Cache key of the test store.
pub fn identity() -> StoreIdentity {
    StoreIdentity::from_remote(REMOTE)
}

/// An Apple configuration for the test store.
pub fn apple(environment: Environment) -> Config {
    let mut config = Config::new(REMOTE);
    config.environment = environment;
    config.app_identifier = Some(APP.to_string());
    config
}

/// An Android keystore configuration exporting into `destination`.
pub fn android(destination: &Path) -> Config {
    let mut config = Config::new(REMOTE);
    config.android = true;
    config.environment = Environment::Release;
    config.keystore.destination = Some(destination.to_path_buf());
    config
}

fn copy_tree(from: &Path, to: &Path) -> std::io::Result<()> {
    fs::create_dir_all(to)?;
    for entry in fs::read_dir(from)? {
        let entry = entry?;
        let target = to.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_tree(&entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

fn list(root: &Path, dir: &Path, out: &mut Vec<String>) {
    for entry in fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        if path.is_dir() {
            list(root, &path, out);
        } else {
            let relative = path.strip_prefix(root).unwrap();
            out.push(relative.to_string_lossy().replace('\\', "/"));
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}
