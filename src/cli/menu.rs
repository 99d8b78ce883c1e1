//! Interactive menu loop: add / retrieve / delete / exit.
//!
//! Store errors (unknown site, bad blob, database down) are printed and the
//! loop continues. IO errors on the terminal itself end the session.

use super::commands::plural;
use anyhow::Result;
use colored::Colorize;
use sitepass::{CredentialStore, VaultError};
use std::io::{BufRead, Write};
use zeroize::Zeroizing;

pub struct Menu<'a, R, W> {
    store: &'a CredentialStore,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> Menu<'a, R, W> {
    pub fn new(store: &'a CredentialStore, input: R, output: W) -> Self {
        Self {
            store,
            input,
            output,
        }
    }

    /// Run until the user picks "exit" or input ends.
    /// `read_secret` reads the new password without echo.
    pub fn run<F>(mut self, mut read_secret: F) -> Result<()>
    where
        F: FnMut(&str) -> Result<String>,
    {
        loop {
            self.print_menu()?;

            let Some(choice) = self.read_line("Enter your choice: ")? else {
                writeln!(self.output)?;
                break;
            };

            match choice.as_str() {
                "1" => self.add(&mut read_secret)?,
                "2" => self.retrieve()?,
                "3" => self.delete()?,
                "4" => {
                    writeln!(self.output, "Exiting")?;
                    break;
                }
                _ => writeln!(self.output, "{}", "Invalid choice. Please try again".yellow())?,
            }
        }

        self.output.flush()?;
        Ok(())
    }

    fn print_menu(&mut self) -> Result<()> {
        writeln!(self.output)?;
        writeln!(self.output, "{}", "What would you like to do?".cyan().bold())?;
        writeln!(self.output, "  1. Add a new password")?;
        writeln!(self.output, "  2. Retrieve a password")?;
        writeln!(self.output, "  3. Delete a password")?;
        writeln!(self.output, "  4. Exit")?;
        Ok(())
    }

    /// Prompt and read one trimmed line. `None` on end of input.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn read_site(&mut self) -> Result<Option<String>> {
        let Some(site) = self.read_line("Site name: ")? else {
            return Ok(None);
        };
        if site.is_empty() {
            writeln!(self.output, "{}", "Site name cannot be empty".yellow())?;
            return Ok(None);
        }
        Ok(Some(site))
    }

    fn add<F>(&mut self, read_secret: &mut F) -> Result<()>
    where
        F: FnMut(&str) -> Result<String>,
    {
        let Some(site) = self.read_site()? else {
            return Ok(());
        };
        let Some(username) = self.read_line("Username: ")? else {
            return Ok(());
        };
        self.output.flush()?;
        let password = Zeroizing::new(read_secret("Password: ")?);

        match self.store.add(&site, &username, &password) {
            Ok(_) => writeln!(self.output, "{} Password added for {}", "✓".green(), site)?,
            Err(e) => self.report(&e)?,
        }
        Ok(())
    }

    fn retrieve(&mut self) -> Result<()> {
        let Some(site) = self.read_site()? else {
            return Ok(());
        };

        match self.store.retrieve_credential(&site) {
            Ok(credential) => {
                writeln!(self.output, "Username: {}", credential.username)?;
                writeln!(self.output, "Password: {}", credential.password.as_str())?;
            }
            Err(e) => self.report(&e)?,
        }
        Ok(())
    }

    fn delete(&mut self) -> Result<()> {
        let Some(site) = self.read_site()? else {
            return Ok(());
        };

        match self.store.delete(&site) {
            Ok(0) => writeln!(self.output, "{}", format!("No password stored for {}", site).yellow())?,
            Ok(n) => writeln!(self.output, "{} Deleted {} entr{} for {}", "✓".green(), n, plural(n), site)?,
            Err(e) => self.report(&e)?,
        }
        Ok(())
    }

    fn report(&mut self, error: &VaultError) -> Result<()> {
        if error.is_not_found() {
            writeln!(self.output, "{}", error.to_string().yellow())?;
        } else {
            writeln!(self.output, "{} {}", "Error:".red(), error)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitepass::crypto::{KEY_LEN, SALT_LEN};
    use sitepass::storage::ensure_schema;
    use sitepass::StoreConfig;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn create_test_store(temp_dir: &TempDir) -> Result<CredentialStore> {
        let config = StoreConfig::new(temp_dir.path().join("passwords.db"));
        ensure_schema(&config.db_path)?;
        Ok(CredentialStore::with_key(&config, &[7u8; KEY_LEN], [0u8; SALT_LEN]))
    }

    fn run_menu(store: &CredentialStore, script: &str, secrets: &[&str]) -> Result<String> {
        let mut secrets = secrets.iter().map(|s| s.to_string());
        let mut output = Vec::new();

        Menu::new(store, Cursor::new(script.as_bytes()), &mut output).run(|_| {
            Ok(secrets.next().unwrap_or_default())
        })?;

        Ok(String::from_utf8(output)?)
    }

    #[test]
    fn test_add_then_retrieve() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let store = create_test_store(&temp_dir)?;

        let output = run_menu(
            &store,
            "1\nexample.com\nalice\n2\nexample.com\n4\n",
            &["Secr3t!"],
        )?;

        assert!(output.contains("Password added for example.com"));
        assert!(output.contains("Username: alice"));
        assert!(output.contains("Password: Secr3t!"));
        assert!(output.contains("Exiting"));
        Ok(())
    }

    #[test]
    fn test_missing_site_keeps_running() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let store = create_test_store(&temp_dir)?;

        let output = run_menu(&store, "2\nnever-added.com\n4\n", &[])?;

        assert!(output.contains("No password stored for site 'never-added.com'"));
        assert!(output.contains("Exiting"));
        Ok(())
    }

    #[test]
    fn test_delete_reports_count() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let store = create_test_store(&temp_dir)?;
        store.add("example.com", "a", "1")?;
        store.add("example.com", "b", "2")?;

        let output = run_menu(&store, "3\nexample.com\n3\nexample.com\n4\n", &[])?;

        assert!(output.contains("Deleted 2 entries for example.com"));
        assert!(output.contains("No password stored for example.com"));
        assert!(store.retrieve("example.com").unwrap_err().is_not_found());
        Ok(())
    }

    #[test]
    fn test_invalid_choice_and_eof() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let store = create_test_store(&temp_dir)?;

        // No explicit exit: end of input ends the loop
        let output = run_menu(&store, "9\n\n", &[])?;

        assert_eq!(output.matches("Invalid choice").count(), 2);
        assert!(!output.contains("Exiting"));
        Ok(())
    }

    #[test]
    fn test_empty_site_name_rejected() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let store = create_test_store(&temp_dir)?;

        let output = run_menu(&store, "1\n\n4\n", &["unused"])?;

        assert!(output.contains("Site name cannot be empty"));
        assert_eq!(store.delete("")?, 0);
        Ok(())
    }
}
