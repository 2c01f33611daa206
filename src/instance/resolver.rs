use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use super::{Instance, InstanceFactory};
use crate::error::{panic_message, ResolutionError};
use crate::metadata::TypeInfo;

/// Produce an instance and check that it really is `expected`.
///
/// Factory errors and factory panics are both reported as values.
pub(crate) fn resolve(
    factory: &InstanceFactory,
    expected: &TypeInfo,
) -> Result<Arc<dyn Instance>, ResolutionError> {
    let produced = match catch_unwind(AssertUnwindSafe(|| factory.produce())) {
        Ok(Ok(instance)) => instance,
        Ok(Err(source)) => {
            return Err(ResolutionError::FactoryFailed {
                declaring_type: expected.name(),
                source,
            })
        }
        Err(payload) => {
            return Err(ResolutionError::FactoryPanicked {
                declaring_type: expected.name(),
                message: panic_message(payload.as_ref()),
            })
        }
    };

    if Instance::instance_type_id(&*produced) != expected.id() {
        return Err(ResolutionError::WrongType {
            expected: expected.name(),
            actual: Instance::instance_type_name(&*produced),
        });
    }

    Ok(produced)
}
