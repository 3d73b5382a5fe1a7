use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::types::{
    AttributeDefinition, AttributeValue, BillingMode, KeySchemaElement, KeyType, ReturnValue,
    ScalarAttributeType,
};
use serde_json::Value as JsonValue;

use super::convert::{item_to_record, json_to_attribute, record_to_item};
use super::{KEY_ATTRIBUTE, PutOutcome, Record, ScanKey, ScanPage, StoreError, StudentStore};
use crate::config::Config;

/// Student store backed by a DynamoDB table keyed by `studentId`
///
/// The SDK client is cheap to clone and pools its connections, so one
/// instance is built at startup and shared by every invocation.
#[derive(Clone)]
pub struct DynamoStore {
    inner: Client,
    table_name: String,
}

impl DynamoStore {
    pub fn new(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            inner: client,
            table_name: table_name.into(),
        }
    }

    /// Create a store from configuration
    ///
    /// Credentials and region come from the standard AWS provider chain.
    /// When `DYNAMODB_ENDPOINT_URL` is set the client targets that endpoint
    /// instead, which is how DynamoDB Local and LocalStack are reached.
    pub async fn from_config(config: &Config) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(endpoint) = &config.dynamodb_endpoint_url {
            tracing::info!("Connecting to DynamoDB endpoint: {}", endpoint);
            loader = loader.endpoint_url(endpoint);
        } else {
            tracing::info!("Connecting to DynamoDB");
        }
        let sdk_config = loader.load().await;

        Self::new(Client::new(&sdk_config), &config.table_name)
    }

    /// Create the table if it does not exist yet
    ///
    /// Only meant for local endpoints; deployed tables are provisioned
    /// outside this service.
    ///
    /// # Errors
    /// Returns an error if describing or creating the table fails
    pub async fn ensure_table(&self) -> Result<()> {
        match self
            .inner
            .describe_table()
            .table_name(&self.table_name)
            .send()
            .await
        {
            Ok(_) => {
                tracing::info!("Table {} already exists", self.table_name);
                return Ok(());
            }
            Err(err)
                if err
                    .as_service_error()
                    .is_some_and(|e| e.is_resource_not_found_exception()) => {}
            Err(err) => {
                return Err(anyhow::Error::new(err).context("Failed to describe DynamoDB table"));
            }
        }

        tracing::info!("Creating table: {}", self.table_name);

        let key_definition = AttributeDefinition::builder()
            .attribute_name(KEY_ATTRIBUTE)
            .attribute_type(ScalarAttributeType::S)
            .build()
            .context("Failed to build key attribute definition")?;
        let key_schema = KeySchemaElement::builder()
            .attribute_name(KEY_ATTRIBUTE)
            .key_type(KeyType::Hash)
            .build()
            .context("Failed to build key schema")?;

        self.inner
            .create_table()
            .table_name(&self.table_name)
            .attribute_definitions(key_definition)
            .key_schema(key_schema)
            .billing_mode(BillingMode::PayPerRequest)
            .send()
            .await
            .context("Failed to create DynamoDB table")?;

        tracing::info!("Table {} created", self.table_name);
        Ok(())
    }

    fn key(id: &str) -> AttributeValue {
        AttributeValue::S(id.to_string())
    }
}

#[async_trait]
impl StudentStore for DynamoStore {
    async fn fetch_one(&self, id: &str) -> Result<Option<Record>, StoreError> {
        let output = self
            .inner
            .get_item()
            .table_name(&self.table_name)
            .key(KEY_ATTRIBUTE, Self::key(id))
            .send()
            .await
            .context("Failed to get item from DynamoDB")?;

        let record = output.item().map(item_to_record).transpose()?;
        tracing::debug!("Read student {} (found: {})", id, record.is_some());
        Ok(record)
    }

    async fn scan_page(&self, start_key: Option<ScanKey>) -> Result<ScanPage, StoreError> {
        let output = self
            .inner
            .scan()
            .table_name(&self.table_name)
            .set_exclusive_start_key(start_key.as_ref().map(record_to_item))
            .send()
            .await
            .context("Failed to scan DynamoDB table")?;

        let items = output
            .items()
            .iter()
            .map(item_to_record)
            .collect::<Result<Vec<_>>>()?;
        let last_key = output
            .last_evaluated_key()
            .map(item_to_record)
            .transpose()?;

        Ok(ScanPage { items, last_key })
    }

    async fn put(&self, record: Record) -> Result<PutOutcome, StoreError> {
        let output = self
            .inner
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(record_to_item(&record)))
            .return_values(ReturnValue::AllOld)
            .send()
            .await
            .context("Failed to put item to DynamoDB")?;

        let replaced = output.attributes().is_some_and(|old| !old.is_empty());
        Ok(if replaced {
            PutOutcome::Replaced
        } else {
            PutOutcome::Created
        })
    }

    async fn update_field(
        &self,
        id: &str,
        field: &str,
        value: JsonValue,
    ) -> Result<Record, StoreError> {
        let result = self
            .inner
            .update_item()
            .table_name(&self.table_name)
            .key(KEY_ATTRIBUTE, Self::key(id))
            .update_expression("SET #field = :value")
            .condition_expression("attribute_exists(#key)")
            .expression_attribute_names("#field", field)
            .expression_attribute_names("#key", KEY_ATTRIBUTE)
            .expression_attribute_values(":value", json_to_attribute(&value))
            .return_values(ReturnValue::UpdatedNew)
            .send()
            .await;

        match result {
            Ok(output) => Ok(output
                .attributes()
                .map(item_to_record)
                .transpose()?
                .unwrap_or_default()),
            Err(err)
                if err
                    .as_service_error()
                    .is_some_and(|e| e.is_conditional_check_failed_exception()) =>
            {
                Err(StoreError::NotFound(id.to_string()))
            }
            Err(err) => Err(anyhow::Error::new(err)
                .context("Failed to update item in DynamoDB")
                .into()),
        }
    }

    async fn delete_one(&self, id: &str) -> Result<Option<Record>, StoreError> {
        let output = self
            .inner
            .delete_item()
            .table_name(&self.table_name)
            .key(KEY_ATTRIBUTE, Self::key(id))
            .return_values(ReturnValue::AllOld)
            .send()
            .await
            .context("Failed to delete item from DynamoDB")?;

        Ok(output.attributes().map(item_to_record).transpose()?)
    }
}
