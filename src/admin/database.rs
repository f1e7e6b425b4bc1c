use std::collections::BTreeMap;

use crate::{
    admin::list_records,
    query::QueryRequest,
    quote::{quote_ident, quote_literal},
    resultset::Record,
    InfluxClient, InfluxResult,
};

fn delete_series_statement(measurement: Option<&str>, tags: Option<&BTreeMap<String, String>>) -> String {
    let mut statement = String::from("DROP SERIES");

    if let Some(measurement) = measurement {
        statement.push_str(&format!(" FROM {}", quote_ident(measurement)));
    }

    if let Some(tags) = tags.filter(|tags| !tags.is_empty()) {
        let conditions = tags
            .iter()
            .map(|(key, value)| format!("{}={}", quote_ident(key), quote_literal(value)))
            .collect::<Vec<_>>()
            .join(" AND ");
        statement.push_str(" WHERE ");
        statement.push_str(&conditions);
    }

    statement
}

impl InfluxClient {
    /// List all databases.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use influxdb_client_rs::InfluxClient;
    /// # async fn demo(client: InfluxClient) -> influxdb_client_rs::InfluxResult<()> {
    /// let databases = client.get_list_database().await?;
    /// for database in &databases {
    ///     println!("{}", database["name"]);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn get_list_database(&self) -> InfluxResult<Vec<Record>> {
        let results = self.query(QueryRequest::new("SHOW DATABASES")).send().await?;

        Ok(list_records(results))
    }

    /// Create a new database.
    pub async fn create_database(&self, name: &str) -> InfluxResult<()> {
        self.query(QueryRequest::new(format!("CREATE DATABASE {}", quote_ident(name))))
            .send()
            .await?;

        Ok(())
    }

    /// Drop a database.
    pub async fn drop_database(&self, name: &str) -> InfluxResult<()> {
        self.query(QueryRequest::new(format!("DROP DATABASE {}", quote_ident(name))))
            .send()
            .await?;

        Ok(())
    }

    /// Delete series from a database (the client default when `database` is
    /// `None`), optionally filtered by measurement and by exact tag matches.
    pub async fn delete_series(
        &self,
        database: Option<&str>,
        measurement: Option<&str>,
        tags: Option<&BTreeMap<String, String>>,
    ) -> InfluxResult<()> {
        let database = self.database_or_default(database)?;
        let statement = delete_series_statement(measurement, tags);

        self.query(QueryRequest::new(statement).database(database)).send().await?;

        Ok(())
    }
}

#[cfg(test)]
mod test_database {
    use std::collections::BTreeMap;

    use super::delete_series_statement;

    #[test]
    fn test_delete_series_statement() {
        assert_eq!("DROP SERIES", delete_series_statement(None, None));

        assert_eq!(
            "DROP SERIES FROM \"cpu\"",
            delete_series_statement(Some("cpu"), None)
        );

        let mut tags = BTreeMap::new();
        tags.insert("host".to_string(), "server01".to_string());
        tags.insert("region".to_string(), "us-west".to_string());
        assert_eq!(
            "DROP SERIES FROM \"cpu\" WHERE \"host\"='server01' AND \"region\"='us-west'",
            delete_series_statement(Some("cpu"), Some(&tags))
        );

        let empty = BTreeMap::new();
        assert_eq!("DROP SERIES", delete_series_statement(None, Some(&empty)));
    }
}
