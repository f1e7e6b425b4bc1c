use crate::{admin::list_records, query::QueryRequest, quote::quote_ident, resultset::Record, InfluxClient, InfluxResult};

fn alter_retention_policy_statement(
    name: &str,
    database: &str,
    duration: Option<&str>,
    replication: Option<&str>,
    default: bool,
) -> String {
    let mut statement = format!("ALTER RETENTION POLICY {} ON {}", quote_ident(name), quote_ident(database));

    if let Some(duration) = duration {
        statement.push_str(&format!(" DURATION {}", duration));
    }
    if let Some(replication) = replication {
        statement.push_str(&format!(" REPLICATION {}", replication));
    }
    if default {
        statement.push_str(" DEFAULT");
    }

    statement
}

impl InfluxClient {
    /// Create a retention policy on a database (the client default when
    /// `database` is `None`).
    ///
    /// `duration` takes InfluxQL duration literals such as `1h`, `90m`,
    /// `12h`, `7d` or `4w`, or `INF` for infinite retention. The minimum is
    /// one hour. `replication` is the replication factor as a string.
    pub async fn create_retention_policy(
        &self,
        name: &str,
        duration: &str,
        replication: &str,
        database: Option<&str>,
        default: bool,
    ) -> InfluxResult<()> {
        let database = self.database_or_default(database)?;

        let mut statement = format!(
            "CREATE RETENTION POLICY {} ON {} DURATION {} REPLICATION {}",
            quote_ident(name),
            quote_ident(&database),
            duration,
            replication
        );
        if default {
            statement.push_str(" DEFAULT");
        }

        self.query(QueryRequest::new(statement)).send().await?;

        Ok(())
    }

    /// Modify an existing retention policy. At least one of `duration`,
    /// `replication` or `default` should be given, otherwise the server
    /// rejects the statement.
    pub async fn alter_retention_policy(
        &self,
        name: &str,
        database: Option<&str>,
        duration: Option<&str>,
        replication: Option<&str>,
        default: bool,
    ) -> InfluxResult<()> {
        let database = self.database_or_default(database)?;
        let statement = alter_retention_policy_statement(name, &database, duration, replication, default);

        self.query(QueryRequest::new(statement)).send().await?;

        Ok(())
    }

    /// Drop a retention policy from a database (the client default when
    /// `database` is `None`).
    pub async fn drop_retention_policy(&self, name: &str, database: Option<&str>) -> InfluxResult<()> {
        let database = self.database_or_default(database)?;
        let statement = format!("DROP RETENTION POLICY {} ON {}", quote_ident(name), quote_ident(&database));

        self.query(QueryRequest::new(statement)).send().await?;

        Ok(())
    }

    /// List the retention policies of a database (the client default when
    /// `database` is `None`).
    pub async fn get_list_retention_policies(&self, database: Option<&str>) -> InfluxResult<Vec<Record>> {
        let database = self.database_or_default(database)?;
        let statement = format!("SHOW RETENTION POLICIES ON {}", quote_ident(&database));

        let results = self.query(QueryRequest::new(statement)).send().await?;

        Ok(list_records(results))
    }
}

#[cfg(test)]
mod test_retention_policy {
    use super::alter_retention_policy_statement;

    #[test]
    fn test_alter_statement() {
        assert_eq!(
            "ALTER RETENTION POLICY \"rp\" ON \"db\"",
            alter_retention_policy_statement("rp", "db", None, None, false)
        );

        assert_eq!(
            "ALTER RETENTION POLICY \"rp\" ON \"db\" DURATION 4w REPLICATION 3 DEFAULT",
            alter_retention_policy_statement("rp", "db", Some("4w"), Some("3"), true)
        );
    }
}
