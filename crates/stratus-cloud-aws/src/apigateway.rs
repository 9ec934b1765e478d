//! API Gateway REST APIs, custom domain names and base path mappings

use crate::context::AwsContext;
use crate::error::{SdkResultExt, missing};
use async_trait::async_trait;
use aws_sdk_apigateway::primitives::Blob;
use aws_sdk_apigateway::types::{EndpointConfiguration, Op, PatchOperation, PutMode};
use stratus_cloud::{
    ApiDefinition, ApiGatewayGateway, BasePathMappingRequest, CustomDomainRequest, EndpointType,
    Lookup, ResourceId, Result, invoke_url,
};
use tracing::{debug, info};

/// API Gateway's name for the empty base path
const EMPTY_BASE_PATH: &str = "(none)";

/// Largest page `GetRestApis` / `GetDomainNames` hand out
const PAGE_LIMIT: i32 = 500;

/// [`ApiGatewayGateway`] backed by the API Gateway (REST) API
#[derive(Debug, Clone)]
pub struct RestApiGateway {
    client: aws_sdk_apigateway::Client,
    region: String,
}

impl RestApiGateway {
    pub fn new(client: aws_sdk_apigateway::Client, region: impl Into<String>) -> Self {
        Self {
            client,
            region: region.into(),
        }
    }

    pub fn from_context(context: &AwsContext) -> Self {
        Self::new(context.apigateway_client(), context.region())
    }

    async fn domain_names(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        let mut position = None;
        loop {
            let output = self
                .client
                .get_domain_names()
                .set_position(position)
                .limit(PAGE_LIMIT)
                .send()
                .await
                .map_sdk_err("GetDomainNames")?;
            names.extend(
                output
                    .items()
                    .iter()
                    .filter_map(|d| d.domain_name())
                    .map(str::to_string),
            );
            position = output.position().map(str::to_string);
            if position.is_none() {
                return Ok(names);
            }
        }
    }

    async fn maps_onto(&self, domain_name: &str, rest_api_id: &str) -> Result<bool> {
        let output = self
            .client
            .get_base_path_mappings()
            .domain_name(domain_name)
            .limit(PAGE_LIMIT)
            .send()
            .await
            .map_sdk_err("GetBasePathMappings")?;
        Ok(output
            .items()
            .iter()
            .any(|m| m.rest_api_id() == Some(rest_api_id)))
    }

    async fn domain_exists(&self, domain_name: &str) -> Result<bool> {
        let lookup = self
            .client
            .get_domain_name()
            .domain_name(domain_name)
            .send()
            .await
            .map_sdk_err("GetDomainName")
            .map(|_| Lookup::Found(()));
        Ok(Lookup::from_result(lookup)?.is_found())
    }

    async fn mapping_exists(&self, domain_name: &str, base_path: &str) -> Result<bool> {
        let lookup = self
            .client
            .get_base_path_mapping()
            .domain_name(domain_name)
            .base_path(base_path)
            .send()
            .await
            .map_sdk_err("GetBasePathMapping")
            .map(|_| Lookup::Found(()));
        Ok(Lookup::from_result(lookup)?.is_found())
    }

    async fn describe_domain_target(&self, domain_name: &str) -> Result<Lookup<String>> {
        let output = self
            .client
            .get_domain_name()
            .domain_name(domain_name)
            .send()
            .await
            .map_sdk_err("GetDomainName")?;

        let target = output
            .regional_domain_name()
            .or(output.distribution_domain_name())
            .map(str::to_string);
        Ok(Lookup::non_empty(target))
    }
}

fn endpoint_type(endpoint_type: EndpointType) -> aws_sdk_apigateway::types::EndpointType {
    match endpoint_type {
        EndpointType::Regional => aws_sdk_apigateway::types::EndpointType::Regional,
        EndpointType::Edge => aws_sdk_apigateway::types::EndpointType::Edge,
    }
}

fn replace(path: &str, value: &str) -> PatchOperation {
    PatchOperation::builder()
        .op(Op::Replace)
        .path(path)
        .value(value)
        .build()
}

fn mapping_key(base_path: &str) -> &str {
    if base_path.is_empty() {
        EMPTY_BASE_PATH
    } else {
        base_path
    }
}

#[async_trait]
impl ApiGatewayGateway for RestApiGateway {
    async fn upsert_custom_domain_name(&self, request: &CustomDomainRequest) -> Result<()> {
        if self.domain_exists(&request.domain_name).await? {
            self.client
                .update_domain_name()
                .domain_name(&request.domain_name)
                .patch_operations(replace(
                    "/regionalCertificateArn",
                    &request.regional_certificate_arn,
                ))
                .send()
                .await
                .map_sdk_err("UpdateDomainName")?;
            info!(domain = %request.domain_name, "Updated custom domain name");
            return Ok(());
        }

        self.client
            .create_domain_name()
            .domain_name(&request.domain_name)
            .regional_certificate_arn(&request.regional_certificate_arn)
            .endpoint_configuration(
                EndpointConfiguration::builder()
                    .types(endpoint_type(request.endpoint_type))
                    .build(),
            )
            .send()
            .await
            .map_sdk_err("CreateDomainName")?;
        info!(
            domain = %request.domain_name,
            endpoint_type = request.endpoint_type.as_str(),
            "Created custom domain name"
        );
        Ok(())
    }

    async fn upsert_base_path_mapping(&self, request: &BasePathMappingRequest) -> Result<()> {
        let key = mapping_key(&request.base_path);

        if self.mapping_exists(&request.domain_name, key).await? {
            self.client
                .update_base_path_mapping()
                .domain_name(&request.domain_name)
                .base_path(key)
                .patch_operations(replace("/restapiId", &request.api_gateway_id))
                .patch_operations(replace("/stage", &request.stage))
                .send()
                .await
                .map_sdk_err("UpdateBasePathMapping")?;
            info!(domain = %request.domain_name, base_path = %key, "Updated base path mapping");
            return Ok(());
        }

        let base_path = (!request.base_path.is_empty()).then(|| request.base_path.clone());
        self.client
            .create_base_path_mapping()
            .domain_name(&request.domain_name)
            .rest_api_id(&request.api_gateway_id)
            .set_base_path(base_path)
            .stage(&request.stage)
            .send()
            .await
            .map_sdk_err("CreateBasePathMapping")?;
        info!(domain = %request.domain_name, base_path = %key, "Created base path mapping");
        Ok(())
    }

    async fn find_custom_domain_target(&self, domain_name: &str) -> Result<Lookup<String>> {
        debug!(domain = %domain_name, "Looking up custom domain target");
        Lookup::from_result(self.describe_domain_target(domain_name).await)
    }

    async fn find_rest_api_id(&self, name: &str) -> Result<Lookup<ResourceId>> {
        let mut position = None;
        loop {
            let output = self
                .client
                .get_rest_apis()
                .set_position(position)
                .limit(PAGE_LIMIT)
                .send()
                .await
                .map_sdk_err("GetRestApis")?;

            let found = output
                .items()
                .iter()
                .find(|api| api.name() == Some(name))
                .and_then(|api| api.id());
            if let Some(id) = found {
                debug!(api = %name, rest_api_id = %id, "Found REST API");
                return Ok(Lookup::Found(id.to_string()));
            }

            position = output.position().map(str::to_string);
            if position.is_none() {
                debug!(api = %name, "REST API not found");
                return Ok(Lookup::NotFound);
            }
        }
    }

    async fn find_domain_name_for_api(&self, rest_api_id: &str) -> Result<Lookup<String>> {
        for domain_name in self.domain_names().await? {
            match self.maps_onto(&domain_name, rest_api_id).await {
                Ok(true) => return Ok(Lookup::Found(domain_name)),
                Ok(false) => {}
                // domain removed since it was listed
                Err(e) if e.is_not_found() => {}
                Err(e) => return Err(e),
            }
        }
        debug!(rest_api_id = %rest_api_id, "No custom domain maps onto REST API");
        Ok(Lookup::NotFound)
    }

    async fn import_rest_api(&self, definition: &ApiDefinition) -> Result<ResourceId> {
        let output = self
            .client
            .import_rest_api()
            .body(Blob::new(definition.body.as_bytes()))
            .fail_on_warnings(false)
            .send()
            .await
            .map_sdk_err("ImportRestApi")?;

        let id = output
            .id()
            .ok_or_else(|| missing("ImportRestApi", "id"))?
            .to_string();
        info!(api = %definition.title, rest_api_id = %id, "Imported REST API");
        Ok(id)
    }

    async fn overwrite_rest_api(
        &self,
        rest_api_id: &str,
        definition: &ApiDefinition,
    ) -> Result<()> {
        self.client
            .put_rest_api()
            .rest_api_id(rest_api_id)
            .mode(PutMode::Overwrite)
            .body(Blob::new(definition.body.as_bytes()))
            .fail_on_warnings(false)
            .send()
            .await
            .map_sdk_err("PutRestApi")?;

        info!(api = %definition.title, rest_api_id = %rest_api_id, "Overwrote REST API definition");
        Ok(())
    }

    fn invoke_url(&self, rest_api_id: &str, stage: &str) -> String {
        invoke_url(rest_api_id, &self.region, stage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_base_path_key() {
        assert_eq!(mapping_key(""), "(none)");
        assert_eq!(mapping_key("v1"), "v1");
    }
}
