use std::fmt::Display;

use crate::{
    admin::list_records,
    query::QueryRequest,
    quote::{quote_ident, quote_literal},
    resultset::Record,
    InfluxClient, InfluxResult,
};

/// A database privilege grantable to a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Privilege {
    Read,
    Write,
    All,
}

impl Display for Privilege {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Privilege::Read => "READ",
            Privilege::Write => "WRITE",
            Privilege::All => "ALL",
        };

        write!(f, "{}", s)
    }
}

impl InfluxClient {
    /// List all users and their admin status.
    pub async fn get_list_users(&self) -> InfluxResult<Vec<Record>> {
        let results = self.query(QueryRequest::new("SHOW USERS")).send().await?;

        Ok(list_records(results))
    }

    /// Create a user, optionally with cluster administration privileges.
    pub async fn create_user(&self, username: &str, password: &str, admin: bool) -> InfluxResult<()> {
        let mut statement = format!(
            "CREATE USER {} WITH PASSWORD {}",
            quote_ident(username),
            quote_literal(password)
        );
        if admin {
            statement.push_str(" WITH ALL PRIVILEGES");
        }

        self.query(QueryRequest::new(statement)).send().await?;

        Ok(())
    }

    /// Drop a user.
    pub async fn drop_user(&self, username: &str) -> InfluxResult<()> {
        self.query(QueryRequest::new(format!("DROP USER {}", quote_ident(username))))
            .send()
            .await?;

        Ok(())
    }

    /// Change the password of an existing user.
    pub async fn set_user_password(&self, username: &str, password: &str) -> InfluxResult<()> {
        let statement = format!(
            "SET PASSWORD FOR {} = {}",
            quote_ident(username),
            quote_literal(password)
        );

        self.query(QueryRequest::new(statement)).send().await?;

        Ok(())
    }

    /// Grant cluster administration privileges to a user. Only a cluster
    /// administrator can create or drop databases and manage users.
    pub async fn grant_admin_privileges(&self, username: &str) -> InfluxResult<()> {
        let statement = format!("GRANT ALL PRIVILEGES TO {}", quote_ident(username));

        self.query(QueryRequest::new(statement)).send().await?;

        Ok(())
    }

    /// Revoke cluster administration privileges from a user.
    pub async fn revoke_admin_privileges(&self, username: &str) -> InfluxResult<()> {
        let statement = format!("REVOKE ALL PRIVILEGES FROM {}", quote_ident(username));

        self.query(QueryRequest::new(statement)).send().await?;

        Ok(())
    }

    /// Grant a privilege on a database to a user.
    pub async fn grant_privilege(&self, privilege: Privilege, database: &str, username: &str) -> InfluxResult<()> {
        let statement = format!(
            "GRANT {} ON {} TO {}",
            privilege,
            quote_ident(database),
            quote_ident(username)
        );

        self.query(QueryRequest::new(statement)).send().await?;

        Ok(())
    }

    /// Revoke a privilege on a database from a user.
    pub async fn revoke_privilege(&self, privilege: Privilege, database: &str, username: &str) -> InfluxResult<()> {
        let statement = format!(
            "REVOKE {} ON {} FROM {}",
            privilege,
            quote_ident(database),
            quote_ident(username)
        );

        self.query(QueryRequest::new(statement)).send().await?;

        Ok(())
    }

    /// List the privileges granted to a user.
    pub async fn get_list_privileges(&self, username: &str) -> InfluxResult<Vec<Record>> {
        let statement = format!("SHOW GRANTS FOR {}", quote_ident(username));
        let results = self.query(QueryRequest::new(statement)).send().await?;

        Ok(list_records(results))
    }
}

#[cfg(test)]
mod test_user {
    use super::Privilege;

    #[test]
    fn test_privilege_tokens() {
        assert_eq!("READ", Privilege::Read.to_string());
        assert_eq!("WRITE", Privilege::Write.to_string());
        assert_eq!("ALL", Privilege::All.to_string());
    }
}
