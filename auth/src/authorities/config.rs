use crate::ROLE_PREFIX;
use std::path::PathBuf;

/// Configuration of the role assignment.
#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthoritiesConfig {
    /// Only grant the roles matching an OAuth2 scope of the current access token.
    #[serde(default, skip_serializing_if = "is_default")]
    pub map_oauth_scopes: bool,

    /// The prefix of the granted authorities.
    #[serde(default = "default_role_prefix")]
    pub role_prefix: String,
}

impl Default for AuthoritiesConfig {
    fn default() -> Self {
        Self {
            map_oauth_scopes: false,
            role_prefix: default_role_prefix(),
        }
    }
}

fn default_role_prefix() -> String {
    ROLE_PREFIX.to_string()
}

pub fn is_default<D: Default + PartialEq>(d: &D) -> bool {
    d == &D::default()
}

#[derive(Clone, Debug, clap::Args)]
#[command(rename_all_env = "SCREAMING_SNAKE_CASE", next_help_heading = "Authorities")]
pub struct AuthoritiesConfigArguments {
    /// Only grant the roles matching an OAuth2 scope of the current access token, default is to grant all roles.
    #[arg(
        id = "authorities-map-oauth-scopes",
        default_value_t = false,
        long = "authorities-map-oauth-scopes",
        env = "AUTHORITIES_MAP_OAUTH_SCOPES"
    )]
    pub map_oauth_scopes: bool,

    /// The prefix of the granted authorities
    #[arg(
        id = "authorities-role-prefix",
        default_value = ROLE_PREFIX,
        long = "authorities-role-prefix",
        env = "AUTHORITIES_ROLE_PREFIX"
    )]
    pub role_prefix: String,

    /// Location of the authorities configuration file, replaces the other authorities arguments
    #[arg(
        id = "authorities-configuration",
        long = "authorities-configuration",
        env = "AUTHORITIES_CONFIGURATION"
    )]
    pub config: Option<PathBuf>,
}

impl AuthoritiesConfigArguments {
    /// Load the effective configuration, either from the configuration file or from the arguments.
    pub fn load(self) -> anyhow::Result<AuthoritiesConfig> {
        match self.config {
            Some(config) => {
                log::debug!("Loading authorities configuration from: {}", config.display());
                Ok(serde_yaml::from_reader(std::fs::File::open(config)?)?)
            }
            None => Ok(AuthoritiesConfig {
                map_oauth_scopes: self.map_oauth_scopes,
                role_prefix: self.role_prefix,
            }),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use clap::Parser;
    use std::io::Write;

    #[derive(Debug, Parser)]
    struct Cli {
        #[command(flatten)]
        authorities: AuthoritiesConfigArguments,
    }

    #[test]
    fn defaults() -> anyhow::Result<()> {
        let config = Cli::try_parse_from(["test"])?.authorities.load()?;
        assert_eq!(config, AuthoritiesConfig::default());
        assert!(!config.map_oauth_scopes);
        assert_eq!(config.role_prefix, "ROLE_");
        Ok(())
    }

    #[test]
    fn arguments() -> anyhow::Result<()> {
        let config = Cli::try_parse_from([
            "test",
            "--authorities-map-oauth-scopes",
            "--authorities-role-prefix",
            "SCOPE_",
        ])?
        .authorities
        .load()?;

        assert!(config.map_oauth_scopes);
        assert_eq!(config.role_prefix, "SCOPE_");
        Ok(())
    }

    #[test]
    fn configuration_file() -> anyhow::Result<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        writeln!(file, "mapOauthScopes: true")?;
        let path = file.path().display().to_string();

        let config = Cli::try_parse_from(["test", "--authorities-configuration", path.as_str()])?
        .authorities
        .load()?;

        assert_eq!(
            config,
            AuthoritiesConfig {
                map_oauth_scopes: true,
                role_prefix: "ROLE_".to_string(),
            }
        );
        Ok(())
    }

    #[test]
    fn missing_configuration_file() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("authorities.yaml").display().to_string();

        let result = Cli::try_parse_from(["test", "--authorities-configuration", path.as_str()])?
            .authorities
            .load();

        assert!(result.is_err());
        Ok(())
    }

    #[test]
    fn skip_default_flag() -> anyhow::Result<()> {
        let yaml = serde_yaml::to_string(&AuthoritiesConfig::default())?;
        assert_eq!(yaml.trim(), "rolePrefix: ROLE_");
        Ok(())
    }
}
